//! BGP attribute structs
mod aspath;
mod origin;

use crate::error::DecodeError;
use crate::models::*;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

pub use aspath::*;
pub use origin::*;

/// Attribute types understood by the decoders.
///
/// Codes not listed here are skipped while decoding. The full registry is at IANA:
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-2>
#[allow(non_camel_case_types)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(u8)]
pub enum AttrType {
    ORIGIN = 1,
    AS_PATH = 2,
    NEXT_HOP = 3,
    MULTI_EXIT_DISCRIMINATOR = 4,
    LOCAL_PREFERENCE = 5,
    ATOMIC_AGGREGATE = 6,
    AGGREGATOR = 7,
    COMMUNITIES = 8,
    /// <https://tools.ietf.org/html/rfc4456>
    ORIGINATOR_ID = 9,
    CLUSTER_LIST = 10,
    /// <https://tools.ietf.org/html/rfc4760>
    MP_REACHABLE_NLRI = 14,
    MP_UNREACHABLE_NLRI = 15,
    /// <https://datatracker.ietf.org/doc/html/rfc4360>
    EXTENDED_COMMUNITIES = 16,
    /// <https://datatracker.ietf.org/doc/html/rfc8092>
    LARGE_COMMUNITIES = 32,
}

/// AGGREGATOR attribute: the AS and BGP identifier of the speaker that aggregated the route.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregator {
    pub router_id: Ipv4Addr,
    pub router_as: u32,
}

/// Parses the `ASN:ROUTER_ID` text form, e.g. `64517:10.208.0.2`.
impl FromStr for Aggregator {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidAggregator(s.to_string());
        let (router_as, router_id) = s.split_once(':').ok_or_else(invalid)?;
        Ok(Aggregator {
            router_id: router_id.trim().parse().map_err(|_| invalid())?,
            router_as: router_as.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl Display for Aggregator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.router_as, self.router_id)
    }
}

/// Path attributes shared by every prefix of one UPDATE.
///
/// Absent attributes are `None`, except MULTI_EXIT_DISC which defaults to `0` and
/// ATOMIC_AGGREGATE which defaults to `false`.
#[derive(Debug, PartialEq, Clone, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathAttributes {
    pub origin: Option<Origin>,
    pub as_path: Option<Vec<AsPathSegment>>,
    pub next_hop: Option<Vec<IpAddr>>,
    pub multi_exit_disc: u32,
    pub local_pref: Option<u32>,
    pub atomic_aggregate: bool,
    pub aggregator: Option<Aggregator>,
    pub community: Option<Vec<Community>>,
    pub large_community: Option<Vec<LargeCommunity>>,
    pub extended_community: Option<Vec<ExtendedCommunity>>,
    #[serde(rename = "orginator_id")]
    pub originator_id: Option<IpAddr>,
    pub cluster_list: Option<Vec<IpAddr>>,
}

impl PathAttributes {
    /// Returns the origin AS: the last AS of the path when the path ends in a sequence.
    pub fn origin_asn(&self) -> Option<u32> {
        let last = self.as_path.as_ref()?.last()?;
        match last.segment_type {
            AsPathSegmentType::AS_SEQUENCE => last.asns.last().copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_from_str() {
        let aggr = Aggregator::from_str("64517:10.208.0.2").unwrap();
        assert_eq!(aggr.router_as, 64517);
        assert_eq!(aggr.router_id, Ipv4Addr::new(10, 208, 0, 2));
        assert_eq!(aggr.to_string(), "64517:10.208.0.2");

        assert!(matches!(
            Aggregator::from_str("64517"),
            Err(DecodeError::InvalidAggregator(_))
        ));
        assert!(Aggregator::from_str("10.208.0.2:64517").is_err());
    }

    #[test]
    fn test_default_attributes() {
        let attrs = PathAttributes::default();
        assert_eq!(attrs.multi_exit_disc, 0);
        assert!(!attrs.atomic_aggregate);
        assert!(attrs.origin.is_none());

        let value = serde_json::to_value(&attrs).unwrap();
        assert!(value.get("orginator_id").is_some());
        assert!(value.get("originator_id").is_none());
    }

    #[test]
    fn test_origin_asn() {
        let attrs = PathAttributes {
            as_path: Some(vec![AsPathSegment::sequence(vec![6939, 4826, 139898])]),
            ..Default::default()
        };
        assert_eq!(attrs.origin_asn(), Some(139898));

        let attrs = PathAttributes {
            as_path: Some(vec![
                AsPathSegment::sequence(vec![6939]),
                AsPathSegment::new(AsPathSegmentType::AS_SET, vec![1, 2]),
            ]),
            ..Default::default()
        };
        assert_eq!(attrs.origin_asn(), None);
    }
}
