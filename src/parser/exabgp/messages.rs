//! Message shapes of the ExaBGP JSON API, `exabgp 4.x` encoder.
//!
//! Reference: <https://github.com/Exa-Networks/exabgp/wiki/Controlling-ExaBGP-:-API-for-received-messages>
use crate::models::*;
use crate::parser::utils::OrderedMap;
use serde::Deserialize;
use serde_json::Value;
use std::net::IpAddr;

/// Just enough of a message to know whether it is an update.
#[derive(Debug, Deserialize)]
pub(crate) struct ExaBgpEnvelope {
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
}

/// One ExaBGP message line.
///
/// Identification fields are optional here so their absence can be reported by name.
#[derive(Debug, Deserialize)]
pub(crate) struct ExaBgpMessage {
    pub time: Option<f64>,
    pub neighbor: Option<Neighbor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Neighbor {
    pub address: Option<Endpoints<IpAddr>>,
    pub asn: Option<Endpoints<u32>>,
    pub message: Option<NeighborMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Endpoints<T> {
    pub local: Option<T>,
    pub peer: Option<T>,
}

/// Updates carry an `update` key; end-of-RIB markers carry `eor` instead and have no routes.
#[derive(Debug, Deserialize)]
pub(crate) struct NeighborMessage {
    pub update: Option<UpdateMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateMessage {
    #[serde(default)]
    pub attribute: UpdateAttributes,
    /// family -> next hop -> routes
    #[serde(default)]
    pub announce: OrderedMap<String, OrderedMap<String, Vec<Route>>>,
    /// family -> routes
    #[serde(default)]
    pub withdraw: OrderedMap<String, Vec<Route>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Route {
    pub nlri: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct UpdateAttributes {
    pub origin: Option<String>,
    pub as_path: Option<Vec<u32>>,
    pub confederation_path: Option<Vec<u32>>,
    pub med: Option<u32>,
    pub local_preference: Option<u32>,
    pub atomic_aggregate: Option<Value>,
    pub aggregator: Option<String>,
    pub community: Option<Vec<Community>>,
    pub large_community: Option<Vec<LargeCommunity>>,
    pub extended_community: Option<Vec<ExaExtendedCommunity>>,
    pub originator_id: Option<IpAddr>,
    pub cluster_list: Option<Vec<IpAddr>>,
}

/// Extended communities come as the raw integer, or as an object holding the integer next to
/// ExaBGP's own rendering of it (`string`, ignored).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ExaExtendedCommunity {
    Raw(u64),
    Annotated { value: u64 },
}

impl ExaExtendedCommunity {
    pub fn raw(&self) -> u64 {
        match self {
            ExaExtendedCommunity::Raw(value) | ExaExtendedCommunity::Annotated { value } => *value,
        }
    }
}
