//! Reading and writing typed records as loose JSON objects.
//!
//! A text field only takes a string. Any other value under a known key,
//! `null` included, stays in the record's passenger map under that key, so
//! the key still counts as present and is written back as it came in.

use serde::ser::SerializeMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Remove and return the string under `key`. Other values are left in place.
pub(crate) fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !matches!(map.get(key), Some(Value::String(_))) {
        return None;
    }
    match map.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Write one known field. A passenger held under the same key wins.
pub(crate) fn entry<M, T>(
    map: &mut M,
    key: &str,
    value: Option<&T>,
    extra: &Map<String, Value>,
) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    match (extra.get(key), value) {
        (Some(raw), _) => map.serialize_entry(key, raw),
        (None, Some(value)) => map.serialize_entry(key, value),
        (None, None) => Ok(()),
    }
}

/// Write the passengers not already written by [`entry`].
pub(crate) fn passengers<M: SerializeMap>(
    map: &mut M,
    extra: &Map<String, Value>,
    known: &[&str],
) -> Result<(), M::Error> {
    for (key, value) in extra {
        if !known.contains(&key.as_str()) {
            map.serialize_entry(key, value)?;
        }
    }
    Ok(())
}
