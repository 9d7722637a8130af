//! Mapping tables, one per concern.
//!
//! Location, schedule and registration tables use paths relative to their own
//! section so a channel can be assembled from any `{location, schedule}` pair:
//!
//! ```text
//! LOCATION_MAPPINGS      location.*      <-> channels[i].*
//! SCHEDULE_MAPPINGS      schedule.*      <-> channels[i].events[0].*
//! REGISTRATION_MAPPINGS  registration.*  <-> channels[i].*
//! ```

use super::{FieldDefault, FieldSpec, Transform};
use crate::defaults;

/// Activity-level fields.
pub static FIELD_MAPPINGS: &[FieldSpec] = &[
    FieldSpec::new("title.fi", "traits.translations.fi.name").required(),
    FieldSpec::new("title.en", "traits.translations.en.name"),
    FieldSpec::new("title.sv", "traits.translations.sv.name"),
    FieldSpec::new("type", "traits.type").with_default(FieldDefault::Str(defaults::ACTIVITY_TYPE)),
    FieldSpec::new("required_locales", "traits.requiredLocales")
        .with_default(FieldDefault::StrList(defaults::REQUIRED_LOCALES)),
    FieldSpec::new("summary.fi", "traits.translations.fi.summary"),
    FieldSpec::new("summary.en", "traits.translations.en.summary"),
    FieldSpec::new("summary.sv", "traits.translations.sv.summary"),
    FieldSpec::new("description.fi", "traits.translations.fi.description"),
    FieldSpec::new("description.en", "traits.translations.en.description"),
    FieldSpec::new("description.sv", "traits.translations.sv.description"),
    FieldSpec::new("categories.themes", "traits.theme"),
    FieldSpec::new("categories.formats", "traits.format"),
    FieldSpec::new("categories.locales", "traits.locale"),
    FieldSpec::new("pricing.type", "traits.pricing")
        .with_default(FieldDefault::Str(defaults::PRICING_TYPE))
        .wrapped(),
    FieldSpec::new("pricing.info.fi", "traits.translations.fi.pricing"),
    FieldSpec::new("pricing.info.en", "traits.translations.en.pricing"),
    FieldSpec::new("pricing.info.sv", "traits.translations.sv.pricing"),
    FieldSpec::new("image.id", "traits.photo"),
    FieldSpec::new("image.alt", "traits.photoAlt"),
];

/// Venue fields of one channel.
pub static LOCATION_MAPPINGS: &[FieldSpec] = &[
    FieldSpec::new("type", "type")
        .with_default(FieldDefault::Str(defaults::LOCATION_TYPE))
        .wrapped(),
    FieldSpec::new("accessibility", "accessibility")
        .with_default(FieldDefault::StrList(defaults::ACCESSIBILITY)),
    FieldSpec::new("address.street", "translations.fi.address.street"),
    FieldSpec::new("address.postal_code", "translations.fi.address.postalCode"),
    FieldSpec::new("address.city", "translations.fi.address.city"),
    FieldSpec::new("address.state", "translations.fi.address.state"),
    FieldSpec::new("address.country", "translations.fi.address.country"),
    FieldSpec::new("address.coordinates", "map.center.coordinates"),
    FieldSpec::new("address.zoom", "map.zoom"),
    FieldSpec::new("summary.fi", "translations.fi.summary"),
    FieldSpec::new("summary.en", "translations.en.summary"),
    FieldSpec::new("summary.sv", "translations.sv.summary"),
];

/// Fields of the single recurring event of one channel.
pub static SCHEDULE_MAPPINGS: &[FieldSpec] = &[
    FieldSpec::new("timezone", "timeZone").with_default(FieldDefault::Str(defaults::TIMEZONE)),
    FieldSpec::new("start_date", "start").transform(Transform::DateTimestamp),
    FieldSpec::new("end_date", "recurrence.end").transform(Transform::DateTimestamp),
];

/// Registration fields, stored per channel on the server.
pub static REGISTRATION_MAPPINGS: &[FieldSpec] = &[
    FieldSpec::new("required", "registrationRequired")
        .with_default(FieldDefault::Bool(defaults::REGISTRATION_REQUIRED)),
    FieldSpec::new("url", "registrationUrl"),
    FieldSpec::new("email", "registrationEmail"),
    FieldSpec::new("info.fi", "translations.fi.registration"),
    FieldSpec::new("info.en", "translations.en.registration"),
    FieldSpec::new("info.sv", "translations.sv.registration"),
];
