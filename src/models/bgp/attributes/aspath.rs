use itertools::Itertools;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// AS_PATH segment types, with the canonical codes used by stored route updates.
#[allow(non_camel_case_types)]
#[derive(
    Debug,
    TryFromPrimitive,
    IntoPrimitive,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum AsPathSegmentType {
    AS_SET = 1,
    AS_SEQUENCE = 2,
    AS_CONFED_SET = 3,
    AS_CONFED_SEQUENCE = 4,
}

impl AsPathSegmentType {
    pub fn from_name(name: &str) -> Option<AsPathSegmentType> {
        match name.trim() {
            "AS_SET" => Some(AsPathSegmentType::AS_SET),
            "AS_SEQUENCE" => Some(AsPathSegmentType::AS_SEQUENCE),
            "AS_CONFED_SET" => Some(AsPathSegmentType::AS_CONFED_SET),
            "AS_CONFED_SEQUENCE" => Some(AsPathSegmentType::AS_CONFED_SEQUENCE),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(
            self,
            AsPathSegmentType::AS_SET | AsPathSegmentType::AS_CONFED_SET
        )
    }

    /// Gets if a segment represents the local members of an autonomous system confederation.
    ///
    /// <https://datatracker.ietf.org/doc/html/rfc3065#section-5>
    pub fn is_confed(&self) -> bool {
        matches!(
            self,
            AsPathSegmentType::AS_CONFED_SET | AsPathSegmentType::AS_CONFED_SEQUENCE
        )
    }
}

/// One AS_PATH segment: its type and the ordered AS numbers it carries.
#[derive(Debug, PartialEq, Clone, Eq, Hash, Serialize, Deserialize)]
pub struct AsPathSegment {
    pub segment_type: AsPathSegmentType,
    pub asns: Vec<u32>,
}

impl AsPathSegment {
    pub fn new(segment_type: AsPathSegmentType, asns: Vec<u32>) -> AsPathSegment {
        AsPathSegment { segment_type, asns }
    }

    pub fn sequence(asns: Vec<u32>) -> AsPathSegment {
        AsPathSegment::new(AsPathSegmentType::AS_SEQUENCE, asns)
    }
}

/// Sequences are space separated, sets are wrapped in braces and comma separated. Confederation
/// segments are wrapped in parentheses.
impl Display for AsPathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = match self.segment_type.is_set() {
            true => format!("{{{}}}", self.asns.iter().join(",")),
            false => self.asns.iter().join(" "),
        };
        match self.segment_type.is_confed() {
            true => write!(f, "({})", inner),
            false => write!(f, "{}", inner),
        }
    }
}

/// Displays a full AS path, segments separated by a space.
pub struct AsPathDisplay<'a>(pub &'a [AsPathSegment]);

impl Display for AsPathDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
