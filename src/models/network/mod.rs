//! Common network-related structs.

mod prefix;

pub use prefix::*;
