//! MRT BGP4MP structs
use crate::models::*;
use crate::parser::utils::{deserialize_number, deserialize_opt_number};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A BGP4MP message record.
///
/// `timestamp` is the MRT header time in seconds; `microsecond_timestamp` is only present for
/// `BGP4MP_ET` records. `bgp_message` is absent for state change records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bgp4MpRecord {
    #[serde(deserialize_with = "deserialize_number")]
    pub timestamp: u32,
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub microsecond_timestamp: Option<u32>,
    pub peer_ip: IpAddr,
    pub local_ip: IpAddr,
    #[serde(deserialize_with = "deserialize_number")]
    pub peer_as: u32,
    #[serde(deserialize_with = "deserialize_number")]
    pub local_as: u32,
    #[serde(default)]
    pub bgp_message: Option<BgpUpdate>,
}

/// The BGP message carried by a [Bgp4MpRecord].
///
/// Only UPDATE messages (`msg_type == 2`) carry routes; the route fields are empty for the
/// other message types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgpUpdate {
    #[serde(rename = "type", deserialize_with = "deserialize_number")]
    pub msg_type: u8,
    #[serde(default)]
    pub withdrawn_routes: Vec<Nlri>,
    #[serde(default)]
    pub nlri: Vec<Nlri>,
    #[serde(default)]
    pub path_attributes: Vec<RawAttribute>,
}

impl BgpUpdate {
    pub fn message_type(&self) -> Option<BgpMessageType> {
        BgpMessageType::try_from(self.msg_type).ok()
    }

    pub fn is_update(&self) -> bool {
        self.message_type() == Some(BgpMessageType::UPDATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_reader_dump() {
        let record: Bgp4MpRecord = serde_json::from_str(
            r#"{
                "timestamp": {"1728152101": "2024-10-05 18:15:01"},
                "peer_as": "6695",
                "local_as": 39063,
                "peer_ip": "80.81.193.157",
                "local_ip": "80.81.192.183",
                "bgp_message": {
                    "type": {"2": "UPDATE"},
                    "withdrawn_routes": [],
                    "path_attributes": [{"type": {"1": "ORIGIN"}, "value": {"0": "IGP"}}],
                    "nlri": [{"prefix": "103.25.141.0", "length": 24}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(record.timestamp, 1728152101);
        assert_eq!(record.microsecond_timestamp, None);
        assert_eq!(record.peer_as, 6695);
        let msg = record.bgp_message.unwrap();
        assert!(msg.is_update());
        assert_eq!(msg.path_attributes[0].attr_type, 1);
        assert_eq!(msg.nlri.len(), 1);
    }

    #[test]
    fn test_non_update_message() {
        let msg: BgpUpdate = serde_json::from_str(r#"{"type": 1}"#).unwrap();
        assert_eq!(msg.message_type(), Some(BgpMessageType::OPEN));
        assert!(!msg.is_update());
        assert!(msg.nlri.is_empty());
    }
}
