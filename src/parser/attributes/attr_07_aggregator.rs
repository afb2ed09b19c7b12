use crate::error::DecodeError;
use crate::models::*;
use crate::parser::utils::deserialize_number;
use serde::Deserialize;
use serde_json::Value;
use std::net::Ipv4Addr;

#[derive(Deserialize)]
struct RawAggregator {
    id: Ipv4Addr,
    #[serde(rename = "as", deserialize_with = "deserialize_number")]
    asn: u32,
}

/// Decodes the AGGREGATOR value of an MRT record, `{"id": ROUTER_ID, "as": ASN}`.
pub(crate) fn parse_aggregator(value: &Value) -> Result<Aggregator, DecodeError> {
    let raw = RawAggregator::deserialize(value)
        .map_err(|e| DecodeError::invalid_attribute(AttrType::AGGREGATOR.into(), e))?;
    Ok(Aggregator {
        router_id: raw.id,
        router_as: raw.asn,
    })
}
