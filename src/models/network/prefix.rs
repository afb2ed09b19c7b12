use crate::error::DecodeError;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

/// Network Layer Reachability Information: one prefix and its length.
///
/// The prefix address is kept as given by the source, host bits included. The length is
/// validated against the address family on construction, so an [Nlri] with a `/33` IPv4 prefix
/// cannot be built through [FromStr], [Nlri::new] or deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NlriFields")]
pub struct Nlri {
    pub prefix: IpAddr,
    pub length: u8,
}

#[derive(Deserialize)]
struct NlriFields {
    prefix: IpAddr,
    length: u8,
}

impl TryFrom<NlriFields> for Nlri {
    type Error = DecodeError;

    fn try_from(value: NlriFields) -> Result<Self, Self::Error> {
        Nlri::new(value.prefix, value.length)
    }
}

impl Nlri {
    pub fn new(prefix: IpAddr, length: u8) -> Result<Nlri, DecodeError> {
        // IpNet::new rejects lengths above 32 (IPv4) or 128 (IPv6)
        IpNet::new(prefix, length)?;
        Ok(Nlri { prefix, length })
    }

    pub fn is_ipv4(&self) -> bool {
        self.prefix.is_ipv4()
    }

    /// Returns the prefix as an [IpNet], keeping host bits. `None` if the fields were set by hand
    /// to a length the address family cannot hold.
    pub fn to_ipnet(&self) -> Option<IpNet> {
        IpNet::new(self.prefix, self.length).ok()
    }
}

impl From<IpNet> for Nlri {
    fn from(net: IpNet) -> Self {
        Nlri {
            prefix: net.addr(),
            length: net.prefix_len(),
        }
    }
}

/// Parses the `address/length` form, e.g. `1.1.0.0/24` or `2001:7fb:fe15::/48`.
impl FromStr for Nlri {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, length) = s
            .split_once('/')
            .ok_or_else(|| DecodeError::InvalidPrefix(s.to_string()))?;
        let prefix = prefix
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| DecodeError::InvalidPrefix(s.to_string()))?;
        let length = length
            .trim()
            .parse::<u8>()
            .map_err(|_| DecodeError::InvalidPrefix(s.to_string()))?;
        Nlri::new(prefix, length)
    }
}

impl Display for Nlri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.prefix, self.length)
    }
}
