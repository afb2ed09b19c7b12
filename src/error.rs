/*!
error module defines the error types used in zettabgp.
*/
use std::error::Error;
use thiserror::Error;

/// Error raised by a listener while handling a [RouteUpdate](crate::models::RouteUpdate).
pub type ListenerError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not valid JSON, or its JSON structure does not match the expected message
    /// shape.
    ///
    /// ## Occurs during:
    ///  - Decoding of an ExaBGP JSON line
    ///  - Decoding of a stored route update document
    #[error(transparent)]
    InvalidJson(#[from] serde_json::Error),
    /// A field required to identify the BGP session or the message is missing.
    ///
    /// ## Occurs during:
    ///  - Decoding of an ExaBGP JSON line (`time`, `neighbor.address.*`, `neighbor.asn.*`)
    #[error("missing required field {0}")]
    MissingField(&'static str),
    /// A prefix token that does not follow the `address/length` form.
    #[error("unable to parse prefix: {0:?}")]
    InvalidPrefix(String),
    /// This error represents a [ipnet::PrefixLenError] error. It occurs if a prefix length is
    /// larger than the length of the address it is being applied to.
    #[error("invalid network prefix mask")]
    InvalidPrefixLength(#[from] ipnet::PrefixLenError),
    #[error("unable to parse address: {0:?}")]
    InvalidAddress(String),
    #[error("unable to parse aggregator attribute {0:?}")]
    InvalidAggregator(String),
    #[error("unable to parse community {0:?}")]
    InvalidCommunity(String),
    #[error("unable to parse extended community {0:?}")]
    InvalidExtendedCommunity(String),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(f64),
    /// A path attribute value does not have the shape its type code requires.
    ///
    /// ## Occurs during:
    ///  - Decoding of the path attribute list of a BGP4MP or RIB record
    #[error("invalid value for path attribute type {attr_type}: {source}")]
    InvalidAttribute {
        attr_type: u8,
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    #[error("unknown change type {0}")]
    UnknownChangeType(u8),
}

/// A listener failed while a batch of route updates was fanned out.
///
/// `listener` is the registration index of the failing listener. Listeners registered before it
/// have already seen the record that failed, as well as every record before it.
#[derive(Debug, Error)]
#[error("listener #{listener} failed: {source}")]
pub struct DispatchError {
    pub listener: usize,
    pub source: ListenerError,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl DecodeError {
    pub(crate) fn invalid_attribute<E>(attr_type: u8, source: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        DecodeError::InvalidAttribute {
            attr_type,
            source: source.into(),
        }
    }
}
