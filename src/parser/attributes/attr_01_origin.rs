use crate::models::*;
use crate::parser::utils::token_name;
use log::debug;
use serde_json::Value;

/// Looks up an origin by name, `igp` as sent by ExaBGP or `IGP` as dumped by MRT readers.
///
/// Unknown names leave the origin absent.
pub fn parse_origin_name(name: &str) -> Option<Origin> {
    let origin = Origin::from_name(name);
    if origin.is_none() {
        debug!("ignoring unknown origin {:?}", name);
    }
    origin
}

/// Looks up an origin by its canonical code, 1 to 3.
pub fn parse_origin_code(code: u8) -> Option<Origin> {
    match Origin::try_from(code) {
        Ok(origin) => Some(origin),
        Err(_) => {
            debug!("ignoring unknown origin code {}", code);
            None
        }
    }
}

/// Decodes the ORIGIN value of an MRT record: a name, or a `{code: name}` map.
///
/// A bare number is not resolved, since reader wire codes (0 to 2) differ from the canonical
/// ones.
pub(crate) fn parse_origin(value: &Value) -> Option<Origin> {
    match token_name(value) {
        Some(name) => parse_origin_name(name),
        None => {
            debug!("ignoring origin value {}", value);
            None
        }
    }
}
