use crate::error::DecodeError;
use crate::models::*;
use crate::parser::utils::{numeric_code, token_name};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// Builds an AS path from segments whose type has already been looked up.
///
/// A single segment of unknown type (`None`) makes the whole path absent rather than a partial
/// path.
pub fn build_as_path<I>(segments: I) -> Option<Vec<AsPathSegment>>
where
    I: IntoIterator<Item = (Option<AsPathSegmentType>, Vec<u32>)>,
{
    segments
        .into_iter()
        .map(|(segment_type, asns)| {
            segment_type.map(|segment_type| AsPathSegment::new(segment_type, asns))
        })
        .collect::<Option<Vec<_>>>()
}

pub fn parse_segment_type_name(name: &str) -> Option<AsPathSegmentType> {
    let segment_type = AsPathSegmentType::from_name(name);
    if segment_type.is_none() {
        debug!("unknown AS path segment type {:?}, dropping AS path", name);
    }
    segment_type
}

pub fn parse_segment_type_code(code: u8) -> Option<AsPathSegmentType> {
    match AsPathSegmentType::try_from(code) {
        Ok(segment_type) => Some(segment_type),
        Err(_) => {
            debug!("unknown AS path segment type code {}, dropping AS path", code);
            None
        }
    }
}

#[derive(Deserialize)]
struct RawSegment {
    #[serde(rename = "type")]
    segment_type: Value,
    #[serde(default)]
    value: Vec<Value>,
}

/// Decodes the AS_PATH value of an MRT record: a list of `{type, value}` segments, where the
/// type is a segment type name (or `{code: name}` map) and the value lists the AS numbers.
pub(crate) fn parse_as_path(value: &Value) -> Result<Option<Vec<AsPathSegment>>, DecodeError> {
    let invalid = |e: String| DecodeError::invalid_attribute(AttrType::AS_PATH.into(), e);

    let raw_segments = Vec::<RawSegment>::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(AttrType::AS_PATH.into(), e))?;

    let mut segments = Vec::with_capacity(raw_segments.len());
    for raw in raw_segments {
        // reader wire codes differ from the canonical ones, so bare numbers are not looked up
        let segment_type = match token_name(&raw.segment_type) {
            Some(name) => parse_segment_type_name(name),
            None => {
                debug!("ignoring segment type value {}, dropping AS path", raw.segment_type);
                None
            }
        };
        let asns = raw
            .value
            .iter()
            .map(|asn| {
                numeric_code(asn)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid(format!("invalid AS number {}", asn)))
            })
            .collect::<Result<Vec<u32>, DecodeError>>()?;
        segments.push((segment_type, asns));
    }
    Ok(build_as_path(segments))
}
