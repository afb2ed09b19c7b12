//! BGP Extended Communities Attribute
//!
//! RFC4360: <https://datatracker.ietf.org/doc/html/rfc4360#section-4.5>
//! IANA Codes: <https://www.iana.org/assignments/bgp-extended-communities/bgp-extended-communities.xhtml>
use crate::error::DecodeError;
use crate::models::*;
use serde::Deserialize;
use serde_json::Value;
use std::net::Ipv4Addr;

/// Decodes one 64-bit extended community.
///
/// The high octet selects the layout of the 48-bit value: two-octet AS (`0x00`/`0x40`), IPv4
/// address (`0x01`/`0x41`) and four-octet AS (`0x02`/`0x42`) specific communities are split into
/// global and local administrator. Any other type is kept whole, so no input is rejected.
pub fn parse_extended_community(raw: u64) -> ExtendedCommunity {
    let ec_type = (raw >> 56) as u8;
    let subtype = ((raw >> 48) & 0xFF) as u8;
    let value = raw & EXT_COMMUNITY_VALUE_MASK;
    let community_type = ExtendedCommunityType::from(ec_type);

    use ExtendedCommunityType::*;
    match community_type {
        TransitiveTwoOctetAs | NonTransitiveTwoOctetAs => ExtendedCommunity::TwoOctetAs {
            community_type,
            subtype,
            global_admin: (value >> 32) as u16,
            local_admin: (value & 0xFFFF_FFFF) as u32,
        },
        TransitiveIpv4Addr | NonTransitiveIpv4Addr => ExtendedCommunity::Ipv4Addr {
            community_type,
            subtype,
            global_admin: Ipv4Addr::from((value >> 16) as u32),
            local_admin: (value & 0xFFFF) as u16,
        },
        TransitiveFourOctetAs | NonTransitiveFourOctetAs => ExtendedCommunity::FourOctetAs {
            community_type,
            subtype,
            global_admin: (value >> 16) as u32,
            local_admin: (value & 0xFFFF) as u16,
        },
        _ => ExtendedCommunity::Raw {
            community_type,
            subtype,
            value,
        },
    }
}

/// Decodes a list of raw extended communities, keeping their order. An absent list stays absent.
pub fn parse_extended_communities(raw: Option<&[u64]>) -> Option<Vec<ExtendedCommunity>> {
    raw.map(|values| values.iter().copied().map(parse_extended_community).collect())
}

/// Decodes the EXTENDED_COMMUNITIES value of an MRT record, a list of 64-bit integers.
pub(crate) fn parse_extended_communities_value(
    value: &Value,
) -> Result<Vec<ExtendedCommunity>, DecodeError> {
    let raw = Vec::<u64>::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(AttrType::EXTENDED_COMMUNITIES.into(), e))?;
    Ok(raw.into_iter().map(parse_extended_community).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_two_octet_as() {
        let ec = parse_extended_community(0x0002_FDE8_0000_0064);
        assert_eq!(ec.to_string(), "0x00:0x02:65000:100");

        // global is the upper 16 bits of the value, local what remains
        let raw: u64 = 0x4003_1234_89AB_CDEF;
        let ext_value = raw & EXT_COMMUNITY_VALUE_MASK;
        let ext_gl = ext_value >> 32;
        let ext_loc = ext_value - (ext_gl << 32);
        assert_eq!(
            parse_extended_community(raw).to_string(),
            format!("0x40:0x03:{}:{}", ext_gl, ext_loc)
        );
    }

    #[test]
    fn test_ipv4_and_four_octet_as() {
        let ec = parse_extended_community(0x0102_0A00_0001_0007);
        assert_eq!(ec.to_string(), "0x01:0x02:10.0.0.1:7");

        let ec = parse_extended_community(0x4202_FA56_EA00_0005);
        assert_eq!(ec.to_string(), "0x42:0x02:4200000000:5");
    }

    #[test]
    fn test_other_types_are_lossless() {
        let raw: u64 = 0x0501_0000_0000_002A;
        assert_eq!(parse_extended_community(raw).to_string(), "0x05:0x01:42:");

        let raw: u64 = 0x030C_0000_0000_0008;
        assert_eq!(parse_extended_community(raw).to_string(), "0x03:0x0c:8:");

        for raw in [0u64, u64::MAX, 0x8000_0000_0000_0001, 0x0501_0000_0000_002A] {
            assert_eq!(u64::from(parse_extended_community(raw)), raw);
        }
    }

    #[test]
    fn test_list() {
        assert_eq!(parse_extended_communities(None), None);
        let list =
            parse_extended_communities(Some(&[0x0002_FDE8_0000_0064, 0x0501_0000_0000_002A][..]))
                .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].to_string(), "0x05:0x01:42:");

        assert!(parse_extended_communities_value(&json!([844424930131968u64])).is_ok());
        assert!(parse_extended_communities_value(&json!(["0x00:0x02:1:1"])).is_err());
    }
}
