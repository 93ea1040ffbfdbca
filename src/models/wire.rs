//! Decoding helpers for the payload shapes a document-store backend sends.

use chrono::{DateTime, NaiveDate};
use serde::de::{Deserialize, Deserializer, Error};
use serde_json::Value;

/// Folds a Mongo `_id` into `id`. When both are present, `id` wins.
pub(crate) fn merge_record_id(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        if let Some(raw) = map.remove("_id") {
            map.entry("id").or_insert(raw);
        }
    }
    value
}

/// Serde impls for records that may carry `_id`, `id` or both.
///
/// The type derives its field-level impls with `#[serde(remote = "Self")]`;
/// this wires the trait impls to them, decoding through [`merge_record_id`].
macro_rules! record_serde {
    ($($ty:ident),+ $(,)?) => {$(
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $ty::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                $ty::deserialize($crate::models::wire::merge_record_id(value))
                    .map_err(<D::Error as serde::de::Error>::custom)
            }
        }
    )+};
}

pub(crate) use record_serde;

/// Reads an optional calendar date sent as `YYYY-MM-DD` or as an RFC 3339
/// timestamp. Timestamps keep the date in their own offset.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
}
