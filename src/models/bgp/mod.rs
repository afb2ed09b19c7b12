//! BGP messages and relevant structs.

pub mod attributes;
pub mod community;
pub mod route_update;

pub use attributes::*;
pub use community::*;
pub use route_update::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// BGP message types, <https://tools.ietf.org/html/rfc4271#section-4.1>.
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum BgpMessageType {
    OPEN = 1,
    UPDATE = 2,
    NOTIFICATION = 3,
    KEEPALIVE = 4,
}
