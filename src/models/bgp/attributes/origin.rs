use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// ORIGIN attribute, with the canonical codes used by stored route updates.
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
pub enum Origin {
    IGP = 1,
    EGP = 2,
    INCOMPLETE = 3,
}

impl Origin {
    /// Looks up an origin by name. ExaBGP emits lower case names, MRT readers upper case ones.
    pub fn from_name(name: &str) -> Option<Origin> {
        match name.trim() {
            s if s.eq_ignore_ascii_case("igp") => Some(Origin::IGP),
            s if s.eq_ignore_ascii_case("egp") => Some(Origin::EGP),
            s if s.eq_ignore_ascii_case("incomplete") => Some(Origin::INCOMPLETE),
            _ => None,
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::IGP => write!(f, "IGP"),
            Origin::EGP => write!(f, "EGP"),
            Origin::INCOMPLETE => write!(f, "INCOMPLETE"),
        }
    }
}
