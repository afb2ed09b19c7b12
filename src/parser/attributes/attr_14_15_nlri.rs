//! MP_REACH_NLRI and MP_UNREACH_NLRI, <https://datatracker.ietf.org/doc/html/rfc4760>.
//!
//! MRT readers hand these over already split into next hops and prefixes.
use crate::error::DecodeError;
use crate::models::*;
use serde::Deserialize;
use serde_json::Value;
use std::net::IpAddr;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MpReachNlri {
    #[serde(default)]
    pub next_hop: Vec<IpAddr>,
    #[serde(default)]
    pub nlri: Vec<Nlri>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MpUnreachNlri {
    #[serde(default)]
    pub withdrawn_routes: Vec<Nlri>,
}

pub(crate) fn parse_mp_reach_nlri(value: &Value) -> Result<MpReachNlri, DecodeError> {
    MpReachNlri::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(AttrType::MP_REACHABLE_NLRI.into(), e))
}

pub(crate) fn parse_mp_unreach_nlri(value: &Value) -> Result<MpUnreachNlri, DecodeError> {
    MpUnreachNlri::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(AttrType::MP_UNREACHABLE_NLRI.into(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_parse_mp_nlri() {
        let reach = parse_mp_reach_nlri(&json!({
            "afi": {"2": "IPv6"},
            "next_hop": ["2001:7f8::1a27:5051:c09", "fe80::1"],
            "nlri": [{"prefix": "2a0e:97c0:6a0::", "length": 44}]
        }))
        .unwrap();
        assert_eq!(reach.next_hop.len(), 2);
        assert_eq!(reach.nlri, vec![Nlri::from_str("2a0e:97c0:6a0::/44").unwrap()]);

        let unreach = parse_mp_unreach_nlri(&json!({
            "withdrawn_routes": [{"prefix": "2a0e:97c0:6a0::", "length": 44}]
        }))
        .unwrap();
        assert_eq!(unreach.withdrawn_routes.len(), 1);

        assert!(matches!(
            parse_mp_unreach_nlri(&json!({"withdrawn_routes": [{"prefix": "::", "length": 129}]})),
            Err(DecodeError::InvalidAttribute { attr_type: 15, .. })
        ));
    }
}
