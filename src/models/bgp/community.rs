use crate::error::DecodeError;
use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Regular community, `ASN:VALUE`.
///
/// Both halves are kept as `u32` since the text sources do not bound them to 16 bits.
#[derive(Debug, PartialEq, Copy, Clone, Eq, Hash, Serialize, Deserialize)]
pub struct Community(pub u32, pub u32);

/// Large community structure as defined in [RFC8092](https://datatracker.ietf.org/doc/html/rfc8092)
///
/// Serialized as a three-element integer array, displayed as `GLOBAL_ADMIN:LOCAL_DATA_1:LOCAL_DATA_2`.
#[derive(Debug, PartialEq, Copy, Clone, Eq, Hash, Serialize, Deserialize)]
pub struct LargeCommunity(pub u32, pub u32, pub u32);

/// Type definitions of extended communities
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[repr(u8)]
pub enum ExtendedCommunityType {
    // transitive types
    TransitiveTwoOctetAs = 0x00,
    TransitiveIpv4Addr = 0x01,
    TransitiveFourOctetAs = 0x02,
    TransitiveOpaque = 0x03,

    // non-transitive types
    NonTransitiveTwoOctetAs = 0x40,
    NonTransitiveIpv4Addr = 0x41,
    NonTransitiveFourOctetAs = 0x42,
    NonTransitiveOpaque = 0x43,
    // the rest are either draft or experimental
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Extended Communities.
///
/// ## Overview
///
/// It is a 8-octet data that has flexible definition based on the types:
/// <https://datatracker.ietf.org/doc/html/rfc4360>
///
/// ```text
///        0                   1                   2                   3
///        0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///       |  Type high    |  Type low     |                               |
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+          Value                |
///       |                                                               |
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Only the AS specific and IPv4 address specific classes have their value split into global and
/// local administrator; every other class keeps the 48-bit value as is.
///
/// ## Display
///
/// `TYPE:SUBTYPE:GLOBAL:LOCAL`, with type and subtype as two-digit lowercase hex, e.g.
/// `0x00:0x02:65000:100` or `0x01:0x03:10.0.0.1:7`. The raw form leaves the last field empty:
/// `0x05:0x01:4294967296:`.
///
/// The same text is used for serialization. Deserialization accepts the text or the raw 64-bit
/// integer.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum ExtendedCommunity {
    TwoOctetAs {
        community_type: ExtendedCommunityType,
        subtype: u8,
        global_admin: u16,
        local_admin: u32,
    },
    Ipv4Addr {
        community_type: ExtendedCommunityType,
        subtype: u8,
        global_admin: Ipv4Addr,
        local_admin: u16,
    },
    FourOctetAs {
        community_type: ExtendedCommunityType,
        subtype: u8,
        global_admin: u32,
        local_admin: u16,
    },
    Raw {
        community_type: ExtendedCommunityType,
        subtype: u8,
        value: u64,
    },
}

/// Mask of the 48-bit value field.
pub const EXT_COMMUNITY_VALUE_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

impl ExtendedCommunity {
    pub const fn community_type(&self) -> ExtendedCommunityType {
        match self {
            ExtendedCommunity::TwoOctetAs { community_type, .. }
            | ExtendedCommunity::Ipv4Addr { community_type, .. }
            | ExtendedCommunity::FourOctetAs { community_type, .. }
            | ExtendedCommunity::Raw { community_type, .. } => *community_type,
        }
    }

    pub const fn subtype(&self) -> u8 {
        match self {
            ExtendedCommunity::TwoOctetAs { subtype, .. }
            | ExtendedCommunity::Ipv4Addr { subtype, .. }
            | ExtendedCommunity::FourOctetAs { subtype, .. }
            | ExtendedCommunity::Raw { subtype, .. } => *subtype,
        }
    }

    /// The 48 bits following type and subtype.
    pub fn value(&self) -> u64 {
        match self {
            ExtendedCommunity::TwoOctetAs {
                global_admin,
                local_admin,
                ..
            } => ((*global_admin as u64) << 32) | *local_admin as u64,
            ExtendedCommunity::Ipv4Addr {
                global_admin,
                local_admin,
                ..
            } => ((u32::from(*global_admin) as u64) << 16) | *local_admin as u64,
            ExtendedCommunity::FourOctetAs {
                global_admin,
                local_admin,
                ..
            } => ((*global_admin as u64) << 16) | *local_admin as u64,
            ExtendedCommunity::Raw { value, .. } => *value & EXT_COMMUNITY_VALUE_MASK,
        }
    }
}

impl From<ExtendedCommunity> for u64 {
    fn from(ec: ExtendedCommunity) -> Self {
        let ec_type = u8::from(ec.community_type()) as u64;
        (ec_type << 56) | ((ec.subtype() as u64) << 48) | ec.value()
    }
}

/////////////
// DISPLAY //
/////////////

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

impl Display for LargeCommunity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.0, self.1, self.2)
    }
}

impl Display for ExtendedCommunity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ec_type = u8::from(self.community_type());
        let subtype = self.subtype();
        match self {
            ExtendedCommunity::TwoOctetAs {
                global_admin,
                local_admin,
                ..
            } => write!(
                f,
                "{:#04x}:{:#04x}:{}:{}",
                ec_type, subtype, global_admin, local_admin
            ),
            ExtendedCommunity::Ipv4Addr {
                global_admin,
                local_admin,
                ..
            } => write!(
                f,
                "{:#04x}:{:#04x}:{}:{}",
                ec_type, subtype, global_admin, local_admin
            ),
            ExtendedCommunity::FourOctetAs {
                global_admin,
                local_admin,
                ..
            } => write!(
                f,
                "{:#04x}:{:#04x}:{}:{}",
                ec_type, subtype, global_admin, local_admin
            ),
            ExtendedCommunity::Raw { .. } => {
                write!(f, "{:#04x}:{:#04x}:{}:", ec_type, subtype, self.value())
            }
        }
    }
}

/////////////
// PARSING //
/////////////

fn split_community<const N: usize>(s: &str) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = s.trim().split(':');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(out),
    }
}

impl FromStr for Community {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [asn, value] =
            split_community::<2>(s).ok_or_else(|| DecodeError::InvalidCommunity(s.to_string()))?;
        Ok(Community(asn, value))
    }
}

impl FromStr for LargeCommunity {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [global, data1, data2] =
            split_community::<3>(s).ok_or_else(|| DecodeError::InvalidCommunity(s.to_string()))?;
        Ok(LargeCommunity(global, data1, data2))
    }
}

fn parse_hex_octet(s: &str) -> Option<u8> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    u8::from_str_radix(digits, 16).ok()
}

/// Parses the text produced by the [Display] implementation back into a community.
impl FromStr for ExtendedCommunity {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidExtendedCommunity(s.to_string());

        let mut fields = s.trim().splitn(4, ':');
        let (Some(ec_type), Some(subtype), Some(global), Some(local)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };
        let ec_type = parse_hex_octet(ec_type).ok_or_else(invalid)?;
        let subtype = parse_hex_octet(subtype).ok_or_else(invalid)?;
        let community_type = ExtendedCommunityType::from(ec_type);

        use ExtendedCommunityType::*;
        let community = match community_type {
            TransitiveTwoOctetAs | NonTransitiveTwoOctetAs => ExtendedCommunity::TwoOctetAs {
                community_type,
                subtype,
                global_admin: global.parse().map_err(|_| invalid())?,
                local_admin: local.parse().map_err(|_| invalid())?,
            },
            TransitiveIpv4Addr | NonTransitiveIpv4Addr => ExtendedCommunity::Ipv4Addr {
                community_type,
                subtype,
                global_admin: global.parse().map_err(|_| invalid())?,
                local_admin: local.parse().map_err(|_| invalid())?,
            },
            TransitiveFourOctetAs | NonTransitiveFourOctetAs => ExtendedCommunity::FourOctetAs {
                community_type,
                subtype,
                global_admin: global.parse().map_err(|_| invalid())?,
                local_admin: local.parse().map_err(|_| invalid())?,
            },
            _ => {
                let value: u64 = global.parse().map_err(|_| invalid())?;
                if !local.is_empty() || value > EXT_COMMUNITY_VALUE_MASK {
                    return Err(invalid());
                }
                ExtendedCommunity::Raw {
                    community_type,
                    subtype,
                    value,
                }
            }
        };
        Ok(community)
    }
}

///////////
// SERDE //
///////////

impl Serialize for ExtendedCommunity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtendedCommunityRepr {
    Raw(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ExtendedCommunity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ExtendedCommunityRepr::deserialize(deserializer)? {
            ExtendedCommunityRepr::Raw(raw) => {
                Ok(crate::parser::attributes::parse_extended_community(raw))
            }
            ExtendedCommunityRepr::Text(text) => {
                ExtendedCommunity::from_str(&text).map_err(serde::de::Error::custom)
            }
        }
    }
}
