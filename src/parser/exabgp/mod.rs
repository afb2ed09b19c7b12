//! Decoder for the JSON messages ExaBGP writes to its API processes, one message per line.
use crate::error::DecodeError;
use crate::models::*;
use crate::parser::attributes::{parse_extended_communities, parse_origin_name};
use crate::parser::utils::timestamp_from_f64;
use crate::parser::RouteUpdateDecoder;
use messages::{Endpoints, ExaBgpEnvelope, ExaBgpMessage, UpdateAttributes};
use serde_json::Value;
use std::net::IpAddr;
use std::str::FromStr;

pub(crate) mod messages;

/// Decodes ExaBGP JSON lines, see [parse_exabgp_message].
#[derive(Debug, Default, Clone, Copy)]
pub struct ExaBgpDecoder;

impl RouteUpdateDecoder for ExaBgpDecoder {
    type Input = str;

    fn decode(&self, input: &str) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
        parse_exabgp_message(input)
    }
}

fn required<T>(
    endpoints: Option<Endpoints<T>>,
    local_field: &'static str,
    peer_field: &'static str,
) -> Result<(T, T), DecodeError> {
    let Endpoints { local, peer } = endpoints.ok_or(DecodeError::MissingField(local_field))?;
    let local = local.ok_or(DecodeError::MissingField(local_field))?;
    let peer = peer.ok_or(DecodeError::MissingField(peer_field))?;
    Ok((local, peer))
}

fn parse_update_attributes(attribute: UpdateAttributes) -> Result<PathAttributes, DecodeError> {
    // ExaBGP only ever reports AS_SEQUENCE content in `as-path`
    let confed = attribute
        .confederation_path
        .filter(|path| !path.is_empty())
        .map(|path| AsPathSegment::new(AsPathSegmentType::AS_CONFED_SEQUENCE, path));
    let as_path = match (confed, attribute.as_path) {
        (None, None) => None,
        (confed, path) => Some(
            confed
                .into_iter()
                .chain(path.map(AsPathSegment::sequence))
                .collect(),
        ),
    };

    let atomic_aggregate = match attribute.atomic_aggregate {
        None | Some(Value::Null) => false,
        Some(Value::Bool(atomic)) => atomic,
        Some(_) => true,
    };

    let extended_community: Option<Vec<u64>> = attribute
        .extended_community
        .map(|list| list.iter().map(|ec| ec.raw()).collect());

    Ok(PathAttributes {
        origin: attribute.origin.as_deref().and_then(parse_origin_name),
        as_path,
        next_hop: None,
        multi_exit_disc: attribute.med.unwrap_or(0),
        local_pref: attribute.local_preference,
        atomic_aggregate,
        aggregator: attribute
            .aggregator
            .as_deref()
            .map(Aggregator::from_str)
            .transpose()?,
        community: attribute.community,
        large_community: attribute.large_community,
        extended_community: parse_extended_communities(extended_community.as_deref()),
        originator_id: attribute.originator_id,
        cluster_list: attribute.cluster_list,
    })
}

/// This function parses one ExaBGP JSON message into per-prefix [RouteUpdate]s.
///
/// Returns `Ok(None)` for messages that are not updates (state changes, keepalives, ...).
/// Withdrawals come first, then announcements, each group in the order the message lists its
/// address families, next hops and routes. Every withdrawal and announcement shares the
/// attributes of the message; announcements additionally get their next hop.
pub fn parse_exabgp_message(msg_str: &str) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
    let envelope: ExaBgpEnvelope = serde_json::from_str(msg_str)?;
    if envelope.msg_type.as_deref() != Some("update") {
        return Ok(None);
    }

    let msg: ExaBgpMessage = serde_json::from_str(msg_str)?;
    let timestamp = timestamp_from_f64(msg.time.ok_or(DecodeError::MissingField("time"))?)?;
    let (address, asn, message) = match msg.neighbor {
        Some(neighbor) => (neighbor.address, neighbor.asn, neighbor.message),
        None => (None, None, None),
    };
    let (local_ip, peer_ip) =
        required(address, "neighbor.address.local", "neighbor.address.peer")?;
    let (local_as, peer_as) = required(asn, "neighbor.asn.local", "neighbor.asn.peer")?;

    let update = match message.and_then(|m| m.update) {
        Some(update) => update,
        None => return Ok(Some(vec![])),
    };
    let path_attributes = parse_update_attributes(update.attribute)?;

    let new_update = |change_type: ChangeType, nlri: Nlri, path_attributes: PathAttributes| {
        RouteUpdate {
            timestamp,
            peer_ip,
            local_ip,
            peer_as,
            local_as,
            change_type,
            nlri,
            path_attributes,
        }
    };

    let mut updates = vec![];

    for (_family, routes) in update.withdraw.0 {
        for route in routes {
            let nlri = Nlri::from_str(&route.nlri)?;
            updates.push(new_update(
                ChangeType::WITHDRAW,
                nlri,
                path_attributes.clone(),
            ));
        }
    }

    for (_family, next_hops) in update.announce.0 {
        for (next_hop, routes) in next_hops.0 {
            let next_hop = IpAddr::from_str(next_hop.trim())
                .map_err(|_| DecodeError::InvalidAddress(next_hop.clone()))?;
            let announced_attributes = PathAttributes {
                next_hop: Some(vec![next_hop]),
                ..path_attributes.clone()
            };
            for route in routes {
                let nlri = Nlri::from_str(&route.nlri)?;
                updates.push(new_update(
                    ChangeType::ANNOUNCE,
                    nlri,
                    announced_attributes.clone(),
                ));
            }
        }
    }

    Ok(Some(updates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_update() {
        let msg = r#"{ "exabgp": "4.0.1", "time": 1729362670.1, "host" : "node103", "type": "state", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 }, "state": "up" } }"#;
        assert!(parse_exabgp_message(msg).unwrap().is_none());
        assert!(parse_exabgp_message(r#"{"time": 1.0}"#).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_exabgp_message("{ not json"),
            Err(DecodeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_fields() {
        let msg = r#"{ "type": "update", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 } } }"#;
        assert!(matches!(
            parse_exabgp_message(msg),
            Err(DecodeError::MissingField("time"))
        ));

        let msg = r#"{ "type": "update", "time": 1.5, "neighbor": { "address": { "local": "172.17.179.103" }, "asn": { "local": 1, "peer": 1 } } }"#;
        assert!(matches!(
            parse_exabgp_message(msg),
            Err(DecodeError::MissingField("neighbor.address.peer"))
        ));

        let msg = r#"{ "type": "update", "time": 1.5, "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" } } }"#;
        assert!(matches!(
            parse_exabgp_message(msg),
            Err(DecodeError::MissingField("neighbor.asn.local"))
        ));
    }

    #[test]
    fn test_end_of_rib() {
        let msg = r#"{ "exabgp": "4.0.1", "time": 1729362675.3, "type": "update", "neighbor": { "address": { "local": "172.17.179.103", "peer": "172.17.179.104" }, "asn": { "local": 1, "peer": 1 }, "direction": "receive", "message": { "eor": { "afi" : "ipv4", "safi" : "unicast" } } } }"#;
        assert_eq!(parse_exabgp_message(msg).unwrap(), Some(vec![]));
    }

    #[test]
    fn test_confederation_path() {
        let attribute: UpdateAttributes = serde_json::from_str(
            r#"{ "origin": "incomplete", "as-path": [ 12779, 12654 ], "confederation-path": [ 65001 ], "atomic-aggregate": true, "aggregator": "64521:10.6.39.0" }"#,
        )
        .unwrap();
        let attrs = parse_update_attributes(attribute).unwrap();
        assert_eq!(attrs.origin, Some(Origin::INCOMPLETE));
        assert_eq!(
            attrs.as_path,
            Some(vec![
                AsPathSegment::new(AsPathSegmentType::AS_CONFED_SEQUENCE, vec![65001]),
                AsPathSegment::sequence(vec![12779, 12654]),
            ])
        );
        assert!(attrs.atomic_aggregate);
        assert_eq!(attrs.aggregator.unwrap().router_as, 64521);

        let attribute: UpdateAttributes =
            serde_json::from_str(r#"{ "as-path": [ 1 ], "confederation-path": [] }"#).unwrap();
        let attrs = parse_update_attributes(attribute).unwrap();
        assert_eq!(attrs.as_path, Some(vec![AsPathSegment::sequence(vec![1])]));
    }

    #[test]
    fn test_bad_aggregator() {
        let attribute: UpdateAttributes =
            serde_json::from_str(r#"{ "aggregator": "10.6.39.0" }"#).unwrap();
        assert!(matches!(
            parse_update_attributes(attribute),
            Err(DecodeError::InvalidAggregator(_))
        ));
    }
}
