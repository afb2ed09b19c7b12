/*!
Provides serde helpers shared by the decoders.

MRT readers that dump records to JSON are not consistent about numbers: a value may come as a
JSON number, as a numeric string, or as a single-entry `{code: name}` map (`{"2": "UPDATE"}`).
The `deserialize_number` helpers accept all three.
*/
use crate::error::DecodeError;
use chrono::{DateTime, TimeZone, Utc};
use serde::de::{Error, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Formatter;
use std::marker::PhantomData;

/// Extracts the numeric code of a JSON number, numeric string, or `{code: name}` map.
pub(crate) fn numeric_code(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) if map.len() == 1 => map.keys().next()?.trim().parse().ok(),
        _ => None,
    }
}

/// Extracts the name of a JSON string or `{code: name}` map.
pub(crate) fn token_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) if map.len() == 1 => map.values().next()?.as_str(),
        _ => None,
    }
}

pub(crate) fn deserialize_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    numeric_code(&value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| D::Error::custom(format!("expected an unsigned number, found {}", value)))
}

pub(crate) fn deserialize_opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    numeric_code(&value)
        .and_then(|n| T::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("expected an unsigned number, found {}", value)))
}

/// The entries of a JSON object, in document order.
///
/// `serde_json::Map` sorts its keys unless the `preserve_order` feature is on; visiting the map
/// directly keeps the order the producer wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderedMap<K, V>(pub Vec<(K, V)>);

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        OrderedMap(Vec::new())
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = OrderedMap<K, V>;

            fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Converts fractional epoch seconds to a UTC timestamp, rounded to the microsecond.
pub(crate) fn timestamp_from_f64(seconds: f64) -> Result<DateTime<Utc>, DecodeError> {
    if !seconds.is_finite() {
        return Err(DecodeError::InvalidTimestamp(seconds));
    }
    let micros = (seconds * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return Err(DecodeError::InvalidTimestamp(seconds));
    }
    Utc.timestamp_micros(micros as i64)
        .single()
        .ok_or(DecodeError::InvalidTimestamp(seconds))
}

/// Combines MRT header seconds with the optional microsecond field of extended timestamps.
pub(crate) fn timestamp_from_parts(
    seconds: u32,
    microseconds: Option<u32>,
) -> Result<DateTime<Utc>, DecodeError> {
    let nanos = microseconds.unwrap_or(0).saturating_mul(1_000);
    Utc.timestamp_opt(seconds as i64, nanos)
        .single()
        .ok_or(DecodeError::InvalidTimestamp(seconds as f64))
}
