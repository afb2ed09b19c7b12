/*!
parser module contains the decoders that turn source messages into [RouteUpdate]s.

Every decoder implements [RouteUpdateDecoder]:
- [ExaBgpDecoder] for ExaBGP JSON lines,
- [Bgp4MpDecoder] for MRT BGP4MP message records,
- [RibDecoder] for MRT TABLE_DUMP_V2 RIB records,
- [DocumentDecoder] for stored route update documents.
*/
use crate::error::DecodeError;
use crate::models::RouteUpdate;

pub(crate) mod utils;

pub mod attributes;
pub mod document;
pub mod exabgp;
pub mod mrt;

pub use document::{parse_document, DocumentDecoder, StoredRouteUpdate};
pub use exabgp::{parse_exabgp_message, ExaBgpDecoder};
pub use mrt::{parse_bgp4mp_record, parse_rib_record, Bgp4MpDecoder, RibDecoder};

/// A stateless decoder from one source message to the route updates it carries.
///
/// `Ok(None)` means the input is valid but not a route update (a state change, an OPEN message,
/// the peer index table). `Ok(Some(vec![]))` means an update without any prefix.
pub trait RouteUpdateDecoder {
    type Input: ?Sized;

    fn decode(&self, input: &Self::Input) -> Result<Option<Vec<RouteUpdate>>, DecodeError>;
}
