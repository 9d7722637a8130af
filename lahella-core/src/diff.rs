//! Field-level comparison of a local record against its server counterpart.
//!
//! Both records are expected in the authoring schema (the server side usually
//! comes from [`crate::Transformer::remote_to_local`]). Records are flattened
//! to dotted paths and compared path by path:
//!
//! - HTML fields compare by extracted text ([`html_texts_equal`]).
//! - Set fields compare ignoring order and duplicates.
//! - Fields with a default compare equal to an omitted value.
//! - Geocoding the server performs on its own is not reported.
//!
//! A missing value and an explicit `null` are treated alike.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::defaults;
use crate::text::html_texts_equal;

/// Paths compared by the text content of their HTML.
pub const HTML_FIELDS: &[&str] = &[
    "summary.fi",
    "summary.en",
    "summary.sv",
    "description.fi",
    "description.en",
    "description.sv",
    "pricing.info.fi",
    "pricing.info.en",
    "pricing.info.sv",
    "registration.info.fi",
    "registration.info.en",
    "registration.info.sv",
    "location.summary.fi",
    "location.summary.en",
    "location.summary.sv",
];

/// Paths whose lists compare as sets.
pub const SET_FIELDS: &[&str] = &[
    "categories.themes",
    "categories.formats",
    "categories.locales",
    "demographics.age_groups",
    "demographics.gender",
    "location.regions",
    "location.accessibility",
];

/// Paths skipped unless metadata comparison is requested.
pub const METADATA_FIELDS: &[&str] = &["_key", "_status"];

/// Fields the server fills in from a street address.
const GEOCODED_FIELDS: &[&str] = &["coordinates", "zoom"];

/// A single differing field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub path: String,
    pub local_value: Value,
    pub server_value: Value,
}

impl FieldDiff {
    pub fn new(path: impl Into<String>, local_value: Value, server_value: Value) -> Self {
        Self {
            path: path.into(),
            local_value,
            server_value,
        }
    }

    /// Present locally, absent on the server.
    pub fn is_added(&self) -> bool {
        self.server_value.is_null()
    }

    /// Present on the server, absent locally.
    pub fn is_removed(&self) -> bool {
        !self.is_added() && self.local_value.is_null()
    }
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.path,
            format_value(&self.server_value),
            format_value(&self.local_value)
        )
    }
}

/// Flattens nested objects (and non-empty lists of objects) to dotted paths.
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    if let Value::Object(map) = value {
        for (key, child) in map {
            flatten_into(child, key.clone(), &mut out);
        }
    }
    out
}

fn flatten_into(value: &Value, path: String, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, format!("{}.{}", path, key), out);
            }
        }
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, format!("{}[{}]", path, i), out);
            }
        }
        _ => {
            out.insert(path, value.clone());
        }
    }
}

/// Path used for policy lookups, with any leading `channels[<i>].` removed.
fn policy_key(path: &str) -> &str {
    let Some(rest) = path.strip_prefix("channels[") else {
        return path;
    };
    match rest.split_once("].") {
        Some((index, tail)) if index.chars().all(|c| c.is_ascii_digit()) => tail,
        _ => path,
    }
}

/// Value assumed when a field is omitted.
fn default_for(key: &str) -> Option<Value> {
    let strs = |items: &[&str]| Value::Array(items.iter().map(|s| Value::from(*s)).collect());
    match key {
        "registration.required" => Some(Value::Bool(defaults::REGISTRATION_REQUIRED)),
        "pricing.type" => Some(Value::from(defaults::PRICING_TYPE)),
        "type" => Some(Value::from(defaults::ACTIVITY_TYPE)),
        "required_locales" => Some(strs(defaults::REQUIRED_LOCALES)),
        "location.type" => Some(Value::from(defaults::LOCATION_TYPE)),
        "location.accessibility" => Some(strs(defaults::ACCESSIBILITY)),
        "schedule.timezone" => Some(Value::from(defaults::TIMEZONE)),
        "schedule.weekly" => Some(Value::Array(Vec::new())),
        _ => contact_fallback(key).map(Value::from),
    }
}

/// Fallback text for a `contacts.list[<i>].description.<locale>` path.
fn contact_fallback(key: &str) -> Option<&'static str> {
    let rest = key.strip_prefix("contacts.list[")?;
    let (index, locale) = rest.split_once("].description.")?;
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    defaults::contact_description(locale)
}

fn same_set(a: &[Value], b: &[Value]) -> bool {
    a.iter().all(|x| b.contains(x)) && b.iter().all(|x| a.contains(x))
}

fn values_equal(path: &str, local: &Value, server: &Value) -> bool {
    if local == server {
        return true;
    }
    let key = policy_key(path);

    if HTML_FIELDS.contains(&key) {
        return html_texts_equal(local.as_str().unwrap_or(""), server.as_str().unwrap_or(""));
    }

    if SET_FIELDS.contains(&key) {
        if let (Value::Array(a), Value::Array(b)) = (local, server) {
            return same_set(a, b);
        }
    }

    if let Some(default) = default_for(key) {
        let matches = |v: &Value| *v == default;
        if (local.is_null() && matches(server)) || (server.is_null() && matches(local)) {
            return true;
        }
        if SET_FIELDS.contains(&key) {
            let as_set = |v: &Value, other: &Value| match (v, other) {
                (Value::Null, Value::Array(b)) => default.as_array().is_some_and(|d| same_set(d, b)),
                _ => false,
            };
            if as_set(local, server) || as_set(server, local) {
                return true;
            }
        }
    }

    false
}

/// Splits `<prefix>.address.<field>` for geocoded fields.
fn geocoded_address(path: &str) -> Option<&str> {
    let (parent, field) = path.rsplit_once('.')?;
    if !GEOCODED_FIELDS.contains(&field) {
        return None;
    }
    let is_address = parent == "address" || parent.ends_with(".address");
    is_address.then_some(parent)
}

fn has_street(flat: &BTreeMap<String, Value>, address: &str) -> bool {
    flat.get(&format!("{}.street", address))
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn is_geocoding_noise(
    diff: &FieldDiff,
    local: &BTreeMap<String, Value>,
    server: &BTreeMap<String, Value>,
) -> bool {
    let Some(address) = geocoded_address(&diff.path) else {
        return false;
    };
    if diff.local_value.is_null() && !diff.server_value.is_null() {
        return true;
    }
    has_street(local, address) || has_street(server, address)
}

/// Compares `local` with `server`, returning differences sorted by path.
pub fn diff(local: &Value, server: &Value, ignore_metadata: bool) -> Vec<FieldDiff> {
    let local_flat = flatten(local);
    let server_flat = flatten(server);

    let paths: BTreeSet<&String> = local_flat.keys().chain(server_flat.keys()).collect();

    let mut diffs = Vec::new();
    for path in paths {
        if ignore_metadata && METADATA_FIELDS.contains(&path.as_str()) {
            continue;
        }
        let local_value = local_flat.get(path).cloned().unwrap_or(Value::Null);
        let server_value = server_flat.get(path).cloned().unwrap_or(Value::Null);
        if !values_equal(path, &local_value, &server_value) {
            diffs.push(FieldDiff::new(path.clone(), local_value, server_value));
        }
    }

    let image_id = |flat: &BTreeMap<String, Value>| {
        flat.get("image.id")
            .filter(|v| !v.is_null() && v.as_str() != Some(""))
            .cloned()
    };
    if let (Some(l), Some(s)) = (image_id(&local_flat), image_id(&server_flat)) {
        if l == s {
            diffs.retain(|d| d.path != "image.path");
        }
    }

    diffs.retain(|d| !is_geocoding_noise(d, &local_flat, &server_flat));
    diffs
}

/// Renders diffs for the terminal, one `+`/`-`/`~` entry per field.
pub fn format_diffs(diffs: &[FieldDiff]) -> String {
    if diffs.is_empty() {
        return "No changes detected.".to_string();
    }

    let mut lines = Vec::new();
    for diff in diffs {
        if diff.is_added() {
            lines.push(format!("  + {}: {}", diff.path, format_value(&diff.local_value)));
        } else if diff.is_removed() {
            lines.push(format!("  - {}: {}", diff.path, format_value(&diff.server_value)));
        } else {
            lines.push(format!("  ~ {}:", diff.path));
            lines.push(format!("      server: {}", format_value(&diff.server_value)));
            lines.push(format!("      local:  {}", format_value(&diff.local_value)));
        }
    }
    lines.join("\n")
}

/// Renders one value, quoting strings and truncating long ones.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "(none)".to_string(),
        Value::String(s) if s.chars().count() > 60 => {
            let head: String = s.chars().take(57).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
