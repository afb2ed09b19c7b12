use crate::error::DecodeError;
use crate::models::*;
use crate::parser::attributes::parse_attributes;
use crate::parser::utils::timestamp_from_parts;
use crate::parser::RouteUpdateDecoder;
use log::debug;
use std::net::{IpAddr, Ipv4Addr};

/// Decodes TABLE_DUMP_V2 RIB records, see [parse_rib_record].
#[derive(Debug, Default, Clone, Copy)]
pub struct RibDecoder;

impl RouteUpdateDecoder for RibDecoder {
    type Input = RibRecord;

    fn decode(&self, input: &RibRecord) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
        parse_rib_record(input)
    }
}

/// Converts one RIB record into one announcement per RIB entry.
///
/// The peer index table and other non-RIB subtypes return `Ok(None)`. Peers the reader did not
/// resolve are reported as `0.0.0.0` / AS 0, and so is the local side of every update.
pub fn parse_rib_record(record: &RibRecord) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
    match record.table_type() {
        Some(table_type) if table_type.is_rib() => {}
        _ => {
            debug!("skipping TABLE_DUMP_V2 subtype {}", record.subtype);
            return Ok(None);
        }
    }

    let prefix = record.prefix.ok_or(DecodeError::MissingField("prefix"))?;
    let length = record.length.ok_or(DecodeError::MissingField("length"))?;
    let nlri = Nlri::new(prefix, length)?;
    let timestamp = timestamp_from_parts(record.timestamp, None)?;
    let unspecified = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    let mut updates = Vec::with_capacity(record.rib_entries.len());
    for entry in &record.rib_entries {
        let decoded = parse_attributes(&entry.path_attributes)?;
        updates.push(RouteUpdate {
            timestamp,
            peer_ip: entry.peer_ip.unwrap_or(unspecified),
            local_ip: unspecified,
            peer_as: entry.peer_as.unwrap_or(0),
            local_as: 0,
            change_type: ChangeType::ANNOUNCE,
            nlri,
            path_attributes: decoded.path_attributes,
        });
    }

    Ok(Some(updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_peer_index_table() {
        let record: RibRecord = serde_json::from_value(json!({
            "timestamp": 1728151200,
            "subtype": {"1": "PEER_INDEX_TABLE"},
            "peer_entries": []
        }))
        .unwrap();
        assert_eq!(parse_rib_record(&record).unwrap(), None);
    }

    #[test]
    fn test_one_update_per_entry() {
        let record: RibRecord = serde_json::from_value(json!({
            "timestamp": 1728151200,
            "subtype": 2,
            "prefix": "1.0.0.0",
            "length": 24,
            "rib_entries": [
                {
                    "peer_index": 0,
                    "peer_ip": "80.81.193.157",
                    "peer_as": 6695,
                    "path_attributes": [
                        {"type": 1, "value": "IGP"},
                        {"type": 3, "value": "80.81.192.172"}
                    ]
                },
                {
                    "peer_index": 1,
                    "path_attributes": [{"type": 1, "value": "INCOMPLETE"}]
                }
            ]
        }))
        .unwrap();
        let updates = parse_rib_record(&record).unwrap().unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.change_type == ChangeType::ANNOUNCE));
        assert!(updates.iter().all(|u| u.nlri.to_string() == "1.0.0.0/24"));
        assert_eq!(updates[0].peer_as, 6695);
        assert_eq!(updates[0].path_attributes.origin, Some(Origin::IGP));
        assert_eq!(updates[1].peer_ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(updates[1].peer_as, 0);
        assert_eq!(updates[1].path_attributes.origin, Some(Origin::INCOMPLETE));
    }

    #[test]
    fn test_missing_prefix() {
        let record: RibRecord =
            serde_json::from_value(json!({"timestamp": 1, "subtype": 4, "rib_entries": []}))
                .unwrap();
        assert!(matches!(
            parse_rib_record(&record),
            Err(DecodeError::MissingField("prefix"))
        ));
    }
}
