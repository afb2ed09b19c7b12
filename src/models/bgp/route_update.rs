use crate::models::*;
use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// # ChangeType
///
/// Whether a [RouteUpdate] makes its prefix reachable (`ANNOUNCE`) or unreachable (`WITHDRAW`).
/// The numeric codes are the ones used by stored route updates.
///
/// ```
/// use zettabgp::models::ChangeType;
///
/// assert!(ChangeType::ANNOUNCE.is_announce());
/// assert_eq!(u8::from(ChangeType::WITHDRAW), 2);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum ChangeType {
    ANNOUNCE = 1,
    WITHDRAW = 2,
}

impl ChangeType {
    pub fn is_announce(&self) -> bool {
        match self {
            ChangeType::ANNOUNCE => true,
            ChangeType::WITHDRAW => false,
        }
    }
}

/// RouteUpdate represents one observed reachability change for one prefix.
///
/// Every decoder produces these, one per withdrawn or announced prefix of the input. All records
/// decoded from the same input share equal (cloned) [PathAttributes].
///
/// Fields:
/// - `timestamp`: when the update was observed, in UTC.
/// - `peer_ip` / `peer_as`: the BGP neighbor that sent the update.
/// - `local_ip` / `local_as`: the collecting side of the session.
/// - `change_type`: announcement or withdrawal.
/// - `nlri`: the affected prefix.
/// - `path_attributes`: the attributes of the UPDATE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteUpdate {
    pub timestamp: DateTime<Utc>,
    pub peer_ip: IpAddr,
    pub local_ip: IpAddr,
    pub peer_as: u32,
    pub local_as: u32,
    pub change_type: ChangeType,
    pub nlri: Nlri,
    pub path_attributes: PathAttributes,
}

struct OptionToStr<'a, T>(&'a Option<T>);

impl<T: Display> Display for OptionToStr<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => Ok(()),
            Some(x) => write!(f, "{x}"),
        }
    }
}

/// Helper struct to print `Option<Vec<T>>` as space separated values.
struct OptionToStrVec<'a, T>(&'a Option<Vec<T>>);

impl<T: Display> Display for OptionToStrVec<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            None => Ok(()),
            Some(v) => write!(f, "{}", v.iter().join(" ")),
        }
    }
}

/// Pipe-separated form, in the column order of [RouteUpdate::get_psv_header].
impl Display for RouteUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let t = match self.change_type {
            ChangeType::ANNOUNCE => "A",
            ChangeType::WITHDRAW => "W",
        };
        let attrs = &self.path_attributes;
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            t,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            &self.peer_ip,
            &self.peer_as,
            &self.local_ip,
            &self.local_as,
            &self.nlri,
            OptionToStr(&attrs.as_path.as_deref().map(AsPathDisplay)),
            OptionToStr(&attrs.origin),
            OptionToStrVec(&attrs.next_hop),
            OptionToStr(&attrs.local_pref),
            attrs.multi_exit_disc,
            OptionToStrVec(&attrs.community),
            OptionToStrVec(&attrs.large_community),
            OptionToStrVec(&attrs.extended_community),
            attrs.atomic_aggregate,
            OptionToStr(&attrs.aggregator),
        )
    }
}

impl RouteUpdate {
    pub fn is_announcement(&self) -> bool {
        self.change_type.is_announce()
    }

    /// Returns the PSV header as a string.
    ///
    /// ```
    /// use zettabgp::models::RouteUpdate;
    ///
    /// let header = RouteUpdate::get_psv_header();
    /// assert_eq!(header, "type|timestamp|peer_ip|peer_as|local_ip|local_as|prefix|as_path|origin|next_hop|local_pref|med|communities|large_communities|extended_communities|atomic|aggregator");
    /// ```
    pub fn get_psv_header() -> String {
        let fields = [
            "type",
            "timestamp",
            "peer_ip",
            "peer_as",
            "local_ip",
            "local_as",
            "prefix",
            "as_path",
            "origin",
            "next_hop",
            "local_pref",
            "med",
            "communities",
            "large_communities",
            "extended_communities",
            "atomic",
            "aggregator",
        ];
        fields.join("|")
    }
}
