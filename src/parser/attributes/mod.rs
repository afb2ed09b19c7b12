//! Decoding of path attributes, from the reader-decoded values found in MRT records and from the
//! text forms ExaBGP and stored route updates use.
mod attr_01_origin;
mod attr_02_as_path;
mod attr_07_aggregator;
mod attr_08_32_communities;
mod attr_14_15_nlri;
mod attr_16_extended_communities;

use crate::error::DecodeError;
use crate::models::*;
use crate::parser::utils::numeric_code;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::net::IpAddr;

pub use attr_01_origin::{parse_origin_code, parse_origin_name};
pub use attr_02_as_path::{build_as_path, parse_segment_type_code, parse_segment_type_name};
pub use attr_16_extended_communities::{parse_extended_communities, parse_extended_community};

use attr_01_origin::parse_origin;
use attr_02_as_path::parse_as_path;
use attr_07_aggregator::parse_aggregator;
use attr_08_32_communities::{parse_communities, parse_large_communities};
use attr_14_15_nlri::{parse_mp_reach_nlri, parse_mp_unreach_nlri};
use attr_16_extended_communities::parse_extended_communities_value;

/// Result of decoding the attribute list of one MRT record.
///
/// `announced` and `withdrawn` only hold the prefixes carried inside MP_REACH_NLRI and
/// MP_UNREACH_NLRI; the prefixes of the record itself are kept by the record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedAttributes {
    pub path_attributes: PathAttributes,
    pub announced: Vec<Nlri>,
    pub withdrawn: Vec<Nlri>,
}

fn parse_u32(attr_type: AttrType, value: &Value) -> Result<u32, DecodeError> {
    numeric_code(value)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            DecodeError::invalid_attribute(attr_type.into(), format!("expected u32, found {}", value))
        })
}

fn parse_typed<'a, T: Deserialize<'a>>(
    attr_type: AttrType,
    value: &'a Value,
) -> Result<T, DecodeError> {
    T::deserialize(value).map_err(|e| DecodeError::invalid_attribute(attr_type.into(), e))
}

/// Decodes the attribute list of an MRT BGP4MP or RIB record in a single pass.
///
/// Only the first attribute of each type is used. Attribute types outside [AttrType] are skipped.
/// A value that does not fit its attribute type fails the whole record.
pub fn parse_attributes(attributes: &[RawAttribute]) -> Result<DecodedAttributes, DecodeError> {
    let mut decoded = DecodedAttributes::default();
    let mut seen: HashSet<AttrType> = HashSet::with_capacity(attributes.len());
    let mut mp_next_hop: Option<Vec<IpAddr>> = None;

    let attrs = &mut decoded.path_attributes;
    for RawAttribute { attr_type, value } in attributes {
        let attr_type = match AttrType::try_from(*attr_type) {
            Ok(t) => t,
            Err(_) => {
                debug!("ignoring path attribute type {}", attr_type);
                continue;
            }
        };
        if !seen.insert(attr_type) {
            debug!("ignoring duplicate path attribute {:?}", attr_type);
            continue;
        }

        match attr_type {
            AttrType::ORIGIN => attrs.origin = parse_origin(value),
            AttrType::AS_PATH => attrs.as_path = parse_as_path(value)?,
            AttrType::NEXT_HOP => attrs.next_hop = Some(vec![parse_typed(attr_type, value)?]),
            AttrType::MULTI_EXIT_DISCRIMINATOR => {
                attrs.multi_exit_disc = parse_u32(attr_type, value)?
            }
            AttrType::LOCAL_PREFERENCE => attrs.local_pref = Some(parse_u32(attr_type, value)?),
            AttrType::ATOMIC_AGGREGATE => {
                attrs.atomic_aggregate = match value {
                    Value::Null => true,
                    Value::String(s) => s.is_empty(),
                    _ => false,
                }
            }
            AttrType::AGGREGATOR => attrs.aggregator = Some(parse_aggregator(value)?),
            AttrType::COMMUNITIES => attrs.community = Some(parse_communities(value)?),
            AttrType::ORIGINATOR_ID => attrs.originator_id = Some(parse_typed(attr_type, value)?),
            AttrType::CLUSTER_LIST => attrs.cluster_list = Some(parse_typed(attr_type, value)?),
            AttrType::MP_REACHABLE_NLRI => {
                let reach = parse_mp_reach_nlri(value)?;
                if !reach.next_hop.is_empty() {
                    mp_next_hop = Some(reach.next_hop);
                }
                decoded.announced = reach.nlri;
            }
            AttrType::MP_UNREACHABLE_NLRI => {
                decoded.withdrawn = parse_mp_unreach_nlri(value)?.withdrawn_routes;
            }
            AttrType::EXTENDED_COMMUNITIES => {
                attrs.extended_community = Some(parse_extended_communities_value(value)?)
            }
            AttrType::LARGE_COMMUNITIES => {
                attrs.large_community = Some(parse_large_communities(value)?)
            }
        }
    }

    if attrs.next_hop.is_none() {
        attrs.next_hop = mp_next_hop;
    }

    Ok(decoded)
}
