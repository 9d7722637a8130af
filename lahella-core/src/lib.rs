//! Lahella Core Library
//!
//! Schema mapping and diffing between the YAML activity catalog and the
//! lahella.fi activity API. Records on both sides are plain
//! [`serde_json::Value`] trees; nothing here touches the filesystem or network.

pub mod defaults;
pub mod diff;
pub mod error;
pub mod ids;
pub mod mapping;
pub mod path;
pub mod special;
pub mod text;
pub mod transformer;
pub mod update;

pub use diff::{diff, format_diffs, format_value, FieldDiff};
pub use error::MappingError;
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use mapping::{date_to_timestamp, timestamp_to_date, Direction, FieldSpec, Transform};
pub use text::{extract_html_text, html_texts_equal, normalize_text};
pub use transformer::Transformer;
pub use update::build_update;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
