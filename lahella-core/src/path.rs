//! Dotted path addressing over `serde_json::Value` trees.
//!
//! A path is a dot-separated list of segments, each a mapping key optionally
//! followed by a sequence index: `channels[0].events[0].start`.
//!
//! Lookups never fail: a missing key, an out-of-range index or a type mismatch
//! along the way simply yields `None`.

use serde_json::{Map, Value};

/// One parsed path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    key: &'a str,
    index: Option<usize>,
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        if let Some(open) = raw.find('[') {
            if let Some(inner) = raw[open + 1..].strip_suffix(']') {
                if let Ok(index) = inner.parse::<usize>() {
                    return Segment {
                        key: &raw[..open],
                        index: Some(index),
                    };
                }
            }
        }
        Segment {
            key: raw,
            index: None,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = Segment<'_>> {
    path.split('.').map(Segment::parse)
}

/// Looks up the value at `path`.
pub fn get<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = obj;
    for segment in segments(path) {
        current = current.as_object()?.get(segment.key)?;
        if let Some(index) = segment.index {
            current = current.as_array()?.get(index)?;
        }
    }
    Some(current)
}

/// Looks up the value at `path`, treating a missing root as absent.
pub fn get_opt<'a>(obj: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    obj.and_then(|o| get(o, path))
}

/// Looks up the value at `path`, falling back to `default`.
pub fn get_or<'a>(obj: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    get(obj, path).unwrap_or(default)
}

/// Looks up a string at `path`.
pub fn get_str<'a>(obj: &'a Value, path: &str) -> Option<&'a str> {
    get(obj, path).and_then(Value::as_str)
}

/// Writes `value` at `path`, creating intermediate mappings and sequences.
///
/// Sequences are padded with empty mappings up to the requested index. Any
/// non-container value met on the way is replaced.
pub fn set(obj: &mut Value, path: &str, value: Value) {
    let parts: Vec<Segment<'_>> = segments(path).collect();
    let last = parts.len() - 1;
    let mut current = obj;

    for (i, segment) in parts.iter().enumerate() {
        let map = ensure_object(current);
        let terminal = i == last;

        match segment.index {
            None if terminal => {
                map.insert(segment.key.to_string(), value);
                return;
            }
            None => {
                current = map
                    .entry(segment.key.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            Some(index) => {
                let slot = map
                    .entry(segment.key.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let items = ensure_array(slot);
                while items.len() <= index {
                    items.push(Value::Object(Map::new()));
                }
                if terminal {
                    items[index] = value;
                    return;
                }
                current = &mut items[index];
            }
        }
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

fn ensure_array(value: &mut Value) -> &mut Vec<Value> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    match value {
        Value::Array(items) => items,
        _ => unreachable!("value was just replaced with an array"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_simple_path() {
        let obj = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get(&obj, "a.b.c"), Some(&json!(42)));
    }

    #[test]
    fn test_get_missing_key() {
        let obj = json!({"a": {"b": 1}});
        assert_eq!(get(&obj, "a.c"), None);
        assert_eq!(get_or(&obj, "a.c", &json!("default")), &json!("default"));
    }

    #[test]
    fn test_get_array_index() {
        let obj = json!({"items": [{"name": "first"}, {"name": "second"}]});
        assert_eq!(get_str(&obj, "items[0].name"), Some("first"));
        assert_eq!(get_str(&obj, "items[1].name"), Some("second"));
    }

    #[test]
    fn test_get_index_out_of_bounds() {
        let obj = json!({"items": [{"name": "only"}]});
        assert_eq!(get(&obj, "items[5].name"), None);
    }

    #[test]
    fn test_get_none_root() {
        assert_eq!(get_opt(None, "a.b"), None);
    }

    #[test]
    fn test_get_through_scalar() {
        let obj = json!({"a": "text"});
        assert_eq!(get(&obj, "a.b"), None);
        assert_eq!(get(&obj, "a[0]"), None);
    }

    #[test]
    fn test_get_nested_arrays() {
        let obj = json!({"channels": [{"events": [{"start": 12345}]}]});
        assert_eq!(get(&obj, "channels[0].events[0].start"), Some(&json!(12345)));
    }

    #[test]
    fn test_set_creates_mappings() {
        let mut obj = json!({});
        set(&mut obj, "a.b.c", json!(42));
        assert_eq!(obj, json!({"a": {"b": {"c": 42}}}));
    }

    #[test]
    fn test_set_keeps_siblings() {
        let mut obj = json!({"a": {"existing": true}});
        set(&mut obj, "a.b.c", json!(42));
        assert_eq!(obj, json!({"a": {"existing": true, "b": {"c": 42}}}));
    }

    #[test]
    fn test_set_array_index() {
        let mut obj = json!({});
        set(&mut obj, "items[0].name", json!("first"));
        assert_eq!(obj, json!({"items": [{"name": "first"}]}));
    }

    #[test]
    fn test_set_extends_array() {
        let mut obj = json!({"items": [{"name": "first"}]});
        set(&mut obj, "items[1].name", json!("second"));
        assert_eq!(obj, json!({"items": [{"name": "first"}, {"name": "second"}]}));
    }

    #[test]
    fn test_set_pads_without_gaps() {
        let mut obj = json!({});
        set(&mut obj, "items[2]", json!("third"));
        assert_eq!(obj, json!({"items": [{}, {}, "third"]}));
    }

    #[test]
    fn test_set_nested_arrays() {
        let mut obj = json!({});
        set(&mut obj, "channels[0].events[0].start", json!(12345));
        assert_eq!(obj, json!({"channels": [{"events": [{"start": 12345}]}]}));
    }

    #[test]
    fn test_set_overwrites() {
        let mut obj = json!({"a": {"b": "old"}});
        set(&mut obj, "a.b", json!("new"));
        assert_eq!(obj, json!({"a": {"b": "new"}}));
    }
}
