/*!
Stored route update documents.

The document store persists each [RouteUpdate] in a flattened form: enums become their numeric
codes, AS paths become `[type_code, [asn, ...]]` pairs and extended communities are kept as their
decoded text. [StoredRouteUpdate] models that form in both directions, which is what replaying a
stored scenario needs.
*/
use crate::error::DecodeError;
use crate::models::*;
use crate::parser::attributes::{build_as_path, parse_origin_code, parse_segment_type_code};
use crate::parser::utils::deserialize_number;
use crate::parser::RouteUpdateDecoder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Decodes stored route update documents, see [parse_document].
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentDecoder;

impl RouteUpdateDecoder for DocumentDecoder {
    type Input = str;

    fn decode(&self, input: &str) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
        parse_document(input)
    }
}

/// Either an RFC 3339 string or fractional epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    Text(DateTime<Utc>),
    Epoch(f64),
}

/// The change type code, stored bare (`1`) or wrapped in a one-element array (`[1]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredChangeType {
    Code(u8),
    Wrapped([u8; 1]),
}

impl StoredChangeType {
    pub fn code(&self) -> u8 {
        match self {
            StoredChangeType::Code(code) | StoredChangeType::Wrapped([code]) => *code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredPathAttributes {
    pub origin: Option<u8>,
    pub as_path: Option<Vec<(u8, Vec<u32>)>>,
    pub next_hop: Option<Vec<IpAddr>>,
    pub multi_exit_disc: Option<u32>,
    pub local_pref: Option<u32>,
    pub atomic_aggregate: Option<bool>,
    pub aggregator: Option<Aggregator>,
    pub community: Option<Vec<Community>>,
    pub large_community: Option<Vec<LargeCommunity>>,
    pub extended_community: Option<Vec<ExtendedCommunity>>,
    #[serde(rename = "orginator_id")]
    pub originator_id: Option<IpAddr>,
    pub cluster_list: Option<Vec<IpAddr>>,
}

/// A [RouteUpdate] as kept by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRouteUpdate {
    pub timestamp: StoredTimestamp,
    pub peer_ip: IpAddr,
    pub local_ip: IpAddr,
    #[serde(deserialize_with = "deserialize_number")]
    pub peer_as: u32,
    #[serde(deserialize_with = "deserialize_number")]
    pub local_as: u32,
    pub change_type: StoredChangeType,
    pub nlri: Nlri,
    #[serde(default)]
    pub path_attributes: StoredPathAttributes,
}

impl From<&PathAttributes> for StoredPathAttributes {
    fn from(attrs: &PathAttributes) -> Self {
        StoredPathAttributes {
            origin: attrs.origin.map(u8::from),
            as_path: attrs.as_path.as_ref().map(|segments| {
                segments
                    .iter()
                    .map(|s| (u8::from(s.segment_type), s.asns.clone()))
                    .collect()
            }),
            next_hop: attrs.next_hop.clone(),
            multi_exit_disc: Some(attrs.multi_exit_disc),
            local_pref: attrs.local_pref,
            atomic_aggregate: Some(attrs.atomic_aggregate),
            aggregator: attrs.aggregator,
            community: attrs.community.clone(),
            large_community: attrs.large_community.clone(),
            extended_community: attrs.extended_community.clone(),
            originator_id: attrs.originator_id,
            cluster_list: attrs.cluster_list.clone(),
        }
    }
}

impl From<&RouteUpdate> for StoredRouteUpdate {
    fn from(update: &RouteUpdate) -> Self {
        StoredRouteUpdate {
            timestamp: StoredTimestamp::Text(update.timestamp),
            peer_ip: update.peer_ip,
            local_ip: update.local_ip,
            peer_as: update.peer_as,
            local_as: update.local_as,
            change_type: StoredChangeType::Code(update.change_type.into()),
            nlri: update.nlri,
            path_attributes: StoredPathAttributes::from(&update.path_attributes),
        }
    }
}

impl From<StoredPathAttributes> for PathAttributes {
    fn from(stored: StoredPathAttributes) -> Self {
        PathAttributes {
            origin: stored.origin.and_then(parse_origin_code),
            as_path: stored.as_path.and_then(|segments| {
                build_as_path(
                    segments
                        .into_iter()
                        .map(|(code, asns)| (parse_segment_type_code(code), asns)),
                )
            }),
            next_hop: stored.next_hop,
            multi_exit_disc: stored.multi_exit_disc.unwrap_or(0),
            local_pref: stored.local_pref,
            atomic_aggregate: stored.atomic_aggregate.unwrap_or(false),
            aggregator: stored.aggregator,
            community: stored.community,
            large_community: stored.large_community,
            extended_community: stored.extended_community,
            originator_id: stored.originator_id,
            cluster_list: stored.cluster_list,
        }
    }
}

impl TryFrom<StoredRouteUpdate> for RouteUpdate {
    type Error = DecodeError;

    fn try_from(stored: StoredRouteUpdate) -> Result<Self, Self::Error> {
        let code = stored.change_type.code();
        let change_type =
            ChangeType::try_from(code).map_err(|_| DecodeError::UnknownChangeType(code))?;
        let timestamp = match stored.timestamp {
            StoredTimestamp::Text(timestamp) => timestamp,
            StoredTimestamp::Epoch(seconds) => crate::parser::utils::timestamp_from_f64(seconds)?,
        };
        Ok(RouteUpdate {
            timestamp,
            peer_ip: stored.peer_ip,
            local_ip: stored.local_ip,
            peer_as: stored.peer_as,
            local_as: stored.local_as,
            change_type,
            nlri: stored.nlri,
            path_attributes: stored.path_attributes.into(),
        })
    }
}

/// Decodes one stored document into the single [RouteUpdate] it holds.
///
/// Never returns `Ok(None)`; every document is a route update.
pub fn parse_document(doc_str: &str) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
    let stored: StoredRouteUpdate = serde_json::from_str(doc_str)?;
    Ok(Some(vec![RouteUpdate::try_from(stored)?]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const DOCUMENT: &str = r#"{
        "timestamp": "2024-10-05T18:15:01.250000Z",
        "peer_ip": "80.81.193.157",
        "local_ip": "80.81.192.183",
        "peer_as": 6695,
        "local_as": 39063,
        "change_type": [1],
        "nlri": {"prefix": "103.25.141.0", "length": 24},
        "path_attributes": {
            "origin": 1,
            "as_path": [[2, [6939, 4826]], [1, [64512, 64513]]],
            "next_hop": ["80.81.192.172"],
            "multi_exit_disc": null,
            "local_pref": null,
            "atomic_aggregate": true,
            "aggregator": {"router_id": "10.208.0.2", "router_as": 64517},
            "community": [[6695, 1911]],
            "large_community": [[6695, 1911, 172]],
            "extended_community": ["0x00:0x02:65000:100", 842122827661412],
            "orginator_id": null,
            "cluster_list": null
        }
    }"#;

    #[test]
    fn test_parse_document() {
        let updates = parse_document(DOCUMENT).unwrap().unwrap();
        assert_eq!(updates.len(), 1);
        let update = &updates[0];
        assert_eq!(update.change_type, ChangeType::ANNOUNCE);
        assert_eq!(update.timestamp.timestamp(), 1728152101);
        assert_eq!(update.timestamp.timestamp_subsec_micros(), 250000);
        assert_eq!(update.nlri, Nlri::from_str("103.25.141.0/24").unwrap());

        let attrs = &update.path_attributes;
        assert_eq!(attrs.origin, Some(Origin::IGP));
        assert_eq!(
            attrs.as_path,
            Some(vec![
                AsPathSegment::sequence(vec![6939, 4826]),
                AsPathSegment::new(AsPathSegmentType::AS_SET, vec![64512, 64513]),
            ])
        );
        assert_eq!(attrs.multi_exit_disc, 0);
        assert!(attrs.atomic_aggregate);
        assert_eq!(attrs.aggregator.map(|a| a.router_as), Some(64517));
        assert_eq!(attrs.large_community, Some(vec![LargeCommunity(6695, 1911, 172)]));
        let ext = attrs.extended_community.as_ref().unwrap();
        assert_eq!(ext[0], ext[1]);
    }

    #[test]
    fn test_document_roundtrip() {
        let update = parse_document(DOCUMENT).unwrap().unwrap().remove(0);
        let stored = serde_json::to_string(&StoredRouteUpdate::from(&update)).unwrap();
        let back = parse_document(&stored).unwrap().unwrap();
        assert_eq!(back, vec![update]);
    }

    #[test]
    fn test_epoch_timestamp_and_withdraw() {
        let doc = r#"{"timestamp": 1729362675.3, "peer_ip": "172.17.179.104", "local_ip": "172.17.179.103", "peer_as": "1", "local_as": 1, "change_type": 2, "nlri": {"prefix": "1.1.0.0", "length": 24}}"#;
        let update = parse_document(doc).unwrap().unwrap().remove(0);
        assert_eq!(update.change_type, ChangeType::WITHDRAW);
        assert_eq!(update.timestamp.timestamp_subsec_micros(), 300000);
        assert_eq!(update.path_attributes, PathAttributes::default());
    }

    #[test]
    fn test_unknown_values() {
        let doc = DOCUMENT.replace(r#""change_type": [1]"#, r#""change_type": 3"#);
        assert!(matches!(
            parse_document(&doc),
            Err(DecodeError::UnknownChangeType(3))
        ));

        let doc = DOCUMENT
            .replace(r#""origin": 1"#, r#""origin": 9"#)
            .replace("[1, [64512", "[5, [64512");
        let update = parse_document(&doc).unwrap().unwrap().remove(0);
        assert_eq!(update.path_attributes.origin, None);
        assert_eq!(update.path_attributes.as_path, None);
    }
}
