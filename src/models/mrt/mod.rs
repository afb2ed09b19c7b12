//! Demultiplexed MRT records, as handed over by an external MRT reader.
//!
//! The reader takes care of the MRT container format; the structs here describe one record of
//! the two types the decoders understand, in the JSON shape such readers dump them.

pub mod bgp4mp;
pub mod table_dump_v2;

pub use bgp4mp::*;
pub use table_dump_v2::*;

use serde::{Deserialize, Serialize};

/// One path attribute as found in an MRT record: the type code and its reader-decoded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttribute {
    #[serde(
        rename = "type",
        deserialize_with = "crate::parser::utils::deserialize_number"
    )]
    pub attr_type: u8,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl RawAttribute {
    pub fn new(attr_type: u8, value: serde_json::Value) -> RawAttribute {
        RawAttribute { attr_type, value }
    }
}
