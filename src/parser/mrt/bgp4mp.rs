use crate::error::DecodeError;
use crate::models::*;
use crate::parser::attributes::parse_attributes;
use crate::parser::utils::timestamp_from_parts;
use crate::parser::RouteUpdateDecoder;
use log::debug;

/// Decodes BGP4MP message records, see [parse_bgp4mp_record].
#[derive(Debug, Default, Clone, Copy)]
pub struct Bgp4MpDecoder;

impl RouteUpdateDecoder for Bgp4MpDecoder {
    type Input = Bgp4MpRecord;

    fn decode(&self, input: &Bgp4MpRecord) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
        parse_bgp4mp_record(input)
    }
}

/// Converts one BGP4MP record into per-prefix [RouteUpdate]s.
///
/// Returns `Ok(None)` unless the record carries an UPDATE message; state change records carry
/// none. Withdrawn prefixes are the message's withdrawn routes followed by those of
/// MP_UNREACH_NLRI; announced prefixes are the message's NLRI followed by those of
/// MP_REACH_NLRI. All withdrawals are listed before all announcements.
pub fn parse_bgp4mp_record(record: &Bgp4MpRecord) -> Result<Option<Vec<RouteUpdate>>, DecodeError> {
    let msg = match &record.bgp_message {
        Some(msg) if msg.is_update() => msg,
        Some(msg) => {
            debug!("skipping BGP message type {}", msg.msg_type);
            return Ok(None);
        }
        None => {
            debug!("skipping BGP4MP record without a BGP message");
            return Ok(None);
        }
    };

    let timestamp = timestamp_from_parts(record.timestamp, record.microsecond_timestamp)?;
    let decoded = parse_attributes(&msg.path_attributes)?;

    let withdrawn = msg.withdrawn_routes.iter().chain(decoded.withdrawn.iter());
    let announced = msg.nlri.iter().chain(decoded.announced.iter());

    let updates = withdrawn
        .map(|nlri| (ChangeType::WITHDRAW, nlri))
        .chain(announced.map(|nlri| (ChangeType::ANNOUNCE, nlri)))
        .map(|(change_type, nlri)| RouteUpdate {
            timestamp,
            peer_ip: record.peer_ip,
            local_ip: record.local_ip,
            peer_as: record.peer_as,
            local_as: record.local_as,
            change_type,
            nlri: *nlri,
            path_attributes: decoded.path_attributes.clone(),
        })
        .collect();

    Ok(Some(updates))
}
