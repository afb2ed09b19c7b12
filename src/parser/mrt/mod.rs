//! This module turns demultiplexed MRT records into per-prefix route updates.
//!
//! Each MRT record may contain reachability information for multiple prefixes. The decoders here
//! break such records down into one [RouteUpdate](crate::models::RouteUpdate) per prefix, each
//! carrying its own copy of the record's path attributes.
mod bgp4mp;
mod rib;

pub use bgp4mp::{parse_bgp4mp_record, Bgp4MpDecoder};
pub use rib::{parse_rib_record, RibDecoder};
