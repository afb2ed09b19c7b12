/*!
The models module defines the route update data model and the input records it is decoded from.
*/

pub mod bgp;
pub mod mrt;
pub mod network;

pub use bgp::*;
pub use mrt::*;
pub use network::*;
