//! Declarative field mapping between the authoring and wire schemas.
//!
//! Each [`FieldSpec`] pairs a local path with a remote path. The tables in
//! [`tables`] are plain data consumed by [`apply_to_remote`] and
//! [`apply_to_local`]; anything that is not a 1:1 field copy lives in
//! [`crate::special`].

pub mod tables;
pub mod transform;

use serde_json::Value;

use crate::error::MappingError;
use crate::path;

pub use tables::{FIELD_MAPPINGS, LOCATION_MAPPINGS, REGISTRATION_MAPPINGS, SCHEDULE_MAPPINGS};
pub use transform::{date_to_timestamp, timestamp_to_date, Direction, Transform};

/// Compile-time default for a mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Str(&'static str),
    Bool(bool),
    StrList(&'static [&'static str]),
}

impl FieldDefault {
    pub fn to_value(&self) -> Value {
        match self {
            FieldDefault::Str(s) => Value::from(*s),
            FieldDefault::Bool(b) => Value::Bool(*b),
            FieldDefault::StrList(items) => {
                Value::Array(items.iter().map(|s| Value::from(*s)).collect())
            }
        }
    }
}

/// One local path <-> remote path mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub local_path: &'static str,
    pub remote_path: &'static str,
    pub transform: Option<Transform>,
    pub default: Option<FieldDefault>,
    pub required: bool,
    /// The remote side holds the value as a one-element array.
    pub array_wrap: bool,
}

impl FieldSpec {
    pub const fn new(local_path: &'static str, remote_path: &'static str) -> Self {
        Self {
            local_path,
            remote_path,
            transform: None,
            default: None,
            required: false,
            array_wrap: false,
        }
    }

    pub const fn transform(self, transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..self
        }
    }

    pub const fn with_default(self, default: FieldDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn wrapped(self) -> Self {
        Self {
            array_wrap: true,
            ..self
        }
    }

    /// Local value for this field, falling back to the default.
    fn local_value(&self, local: &Value) -> Option<Value> {
        match path::get(local, self.local_path) {
            Some(v) => Some(v.clone()),
            None => self.default.map(|d| d.to_value()),
        }
    }
}

/// Absent, `null` and `""` all count as missing for required fields.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Checks every required entry of `specs`, reporting the first missing path.
pub fn validate_required(specs: &[FieldSpec], local: &Value) -> Result<(), MappingError> {
    for spec in specs.iter().filter(|s| s.required) {
        let value = spec.local_value(local);
        if is_missing(value.as_ref()) {
            return Err(MappingError::missing(spec.local_path));
        }
    }
    Ok(())
}

/// Copies every mapped field from `local` into `remote`.
pub fn apply_to_remote(
    specs: &[FieldSpec],
    local: &Value,
    remote: &mut Value,
) -> Result<(), MappingError> {
    for spec in specs {
        let value = spec.local_value(local);
        if spec.required && is_missing(value.as_ref()) {
            return Err(MappingError::missing(spec.local_path));
        }
        let Some(value) = value else {
            continue;
        };

        let mut out = transform::apply(spec.transform, &value, Direction::ToRemote);
        if spec.array_wrap && !out.is_array() {
            out = Value::Array(vec![out]);
        }
        path::set(remote, spec.remote_path, out);
    }
    Ok(())
}

/// Copies every mapped field from `remote` back into `local`.
///
/// Fields absent on the remote side are left out of `local` entirely.
pub fn apply_to_local(specs: &[FieldSpec], remote: &Value, local: &mut Value) {
    for spec in specs {
        let Some(value) = path::get(remote, spec.remote_path) else {
            continue;
        };

        let value = if spec.array_wrap {
            match value {
                Value::Array(items) if items.is_empty() => continue,
                Value::Array(items) if items.len() == 1 => &items[0],
                other => other,
            }
        } else {
            value
        };

        let out = transform::apply(spec.transform, value, Direction::ToLocal);
        path::set(local, spec.local_path, out);
    }
}
