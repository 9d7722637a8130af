//! Structural conversions the mapping tables cannot express.
//!
//! Forward helpers read the authoring record (or one of its sections) and
//! return wire-schema fragments; reverse helpers do the opposite. None of them
//! mutate their input.

use serde_json::{json, Map, Value};

use crate::defaults;
use crate::error::MappingError;
use crate::ids::IdSource;
use crate::mapping::{self, LOCATION_MAPPINGS, REGISTRATION_MAPPINGS, SCHEDULE_MAPPINGS};
use crate::path;

pub const AGE_GROUP_PREFIX: &str = "ageGroup/";
pub const GENDER_PREFIX: &str = "gender/";

fn empty() -> Value {
    Value::Object(Map::new())
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

fn array_at<'a>(obj: &'a Value, at: &str) -> &'a [Value] {
    path::get(obj, at)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// =============================================================================
// Demographics
// =============================================================================

/// Merges `demographics.age_groups` and `demographics.gender` into one list.
///
/// Age groups come first, in authored order, followed by genders.
pub fn merge_demographics(local: &Value) -> Vec<Value> {
    array_at(local, "demographics.age_groups")
        .iter()
        .chain(array_at(local, "demographics.gender"))
        .cloned()
        .collect()
}

/// Splits `traits.demographic` back into age groups and genders by prefix.
///
/// Entries with any other prefix are dropped. Returns `None` when there is
/// nothing to write.
pub fn split_demographics(remote: &Value) -> Option<Value> {
    let entries = path::get(remote, "traits.demographic")?.as_array()?;

    let mut age_groups = Vec::new();
    let mut gender = Vec::new();
    for entry in entries {
        match entry.as_str() {
            Some(s) if s.starts_with(AGE_GROUP_PREFIX) => age_groups.push(entry.clone()),
            Some(s) if s.starts_with(GENDER_PREFIX) => gender.push(entry.clone()),
            _ => tracing::debug!("Dropping demographic entry with unknown prefix: {}", entry),
        }
    }

    let mut out = Map::new();
    if !age_groups.is_empty() {
        out.insert("age_groups".into(), Value::Array(age_groups));
    }
    if !gender.is_empty() {
        out.insert("gender".into(), Value::Array(gender));
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

// =============================================================================
// Weekly schedule
// =============================================================================

/// Renames `schedule.weekly` entries to the server's `daySpecificTimes` shape.
pub fn weekly_to_remote(schedule: &Value) -> Vec<Value> {
    array_at(schedule, "weekly")
        .iter()
        .map(|slot| {
            json!({
                "weekday": slot.get("weekday").cloned().unwrap_or(Value::Null),
                "startTime": slot.get("start_time").cloned().unwrap_or(Value::Null),
                "endTime": slot.get("end_time").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

/// Reads `recurrence.daySpecificTimes` of an event back into `weekly` entries.
pub fn weekly_from_remote(event: &Value) -> Option<Vec<Value>> {
    let slots = path::get(event, "recurrence.daySpecificTimes")?.as_array()?;
    Some(
        slots
            .iter()
            .map(|slot| {
                json!({
                    "weekday": slot.get("weekday").cloned().unwrap_or(Value::Null),
                    "start_time": slot.get("startTime").cloned().unwrap_or(Value::Null),
                    "end_time": slot.get("endTime").cloned().unwrap_or(Value::Null),
                })
            })
            .collect(),
    )
}

// =============================================================================
// Contacts
// =============================================================================

/// Builds server contacts from `contacts.list`.
///
/// Contacts without an `id` get a fresh one. Every locale with a fallback
/// description gets one unless the author wrote their own.
pub fn contacts_to_remote(local: &Value, ids: &dyn IdSource) -> Vec<Value> {
    array_at(local, "contacts.list")
        .iter()
        .filter(|c| c.is_object())
        .map(|contact| {
            let id = contact
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| ids.next_id());

            let authored = contact.get("description").and_then(Value::as_object);
            let mut translations = Map::new();
            for (locale, fallback) in defaults::CONTACT_DESCRIPTIONS {
                let text = authored
                    .and_then(|d| d.get(*locale))
                    .cloned()
                    .unwrap_or_else(|| Value::from(*fallback));
                translations.insert(locale.to_string(), json!({ "description": text }));
            }
            if let Some(authored) = authored {
                for (locale, text) in authored {
                    if !translations.contains_key(locale) {
                        translations.insert(locale.clone(), json!({ "description": text }));
                    }
                }
            }

            let mut out = Map::new();
            out.insert("type".into(), contact.get("type").cloned().unwrap_or(Value::Null));
            out.insert("value".into(), contact.get("value").cloned().unwrap_or(Value::Null));
            out.insert("id".into(), Value::String(id));
            out.insert("translations".into(), Value::Object(translations));
            Value::Object(out)
        })
        .collect()
}

/// Reads server contacts back into `contacts.list` entries, dropping ids.
///
/// A description equal to the fallback text is left out for locales the
/// activity does not require, so generated text does not end up in local files.
pub fn contacts_from_remote(remote: &Value) -> Vec<Value> {
    let required: Vec<&str> = match path::get(remote, "traits.requiredLocales").and_then(Value::as_array) {
        Some(locales) => locales.iter().filter_map(Value::as_str).collect(),
        None => defaults::REQUIRED_LOCALES.to_vec(),
    };

    array_at(remote, "traits.contacts")
        .iter()
        .map(|contact| {
            let mut description = Map::new();
            if let Some(translations) = contact.get("translations").and_then(Value::as_object) {
                for (locale, t) in translations {
                    let Some(text) = t.get("description") else {
                        continue;
                    };
                    let generated = defaults::contact_description(locale)
                        .is_some_and(|fallback| text.as_str() == Some(fallback));
                    if generated && !required.contains(&locale.as_str()) {
                        continue;
                    }
                    description.insert(locale.clone(), text.clone());
                }
            }

            let mut out = Map::new();
            out.insert("type".into(), contact.get("type").cloned().unwrap_or(Value::Null));
            out.insert("value".into(), contact.get("value").cloned().unwrap_or(Value::Null));
            if !description.is_empty() {
                out.insert("description".into(), Value::Object(description));
            }
            Value::Object(out)
        })
        .collect()
}

// =============================================================================
// Regions
// =============================================================================

/// Activity-level region list.
///
/// Single-channel records author it under `location.regions`; multi-channel
/// records contribute the union of every channel's regions, first seen first.
pub fn regions_to_remote(local: &Value) -> Option<Vec<Value>> {
    match path::get(local, "channels").and_then(Value::as_array) {
        Some(channels) => {
            let mut regions: Vec<Value> = Vec::new();
            let mut seen_any = false;
            for channel in channels {
                if let Some(list) = path::get(channel, "location.regions").and_then(Value::as_array) {
                    seen_any = true;
                    for region in list {
                        if !regions.contains(region) {
                            regions.push(region.clone());
                        }
                    }
                }
            }
            seen_any.then_some(regions)
        }
        None => path::get(local, "location.regions")
            .and_then(Value::as_array)
            .cloned(),
    }
}

// =============================================================================
// Channels
// =============================================================================

/// Builds a complete server channel from one venue's sections.
pub fn build_channel(
    location: &Value,
    schedule: &Value,
    registration: &Value,
    ids: &dyn IdSource,
) -> Result<Value, MappingError> {
    let mut channel = json!({ "id": ids.next_id() });

    mapping::apply_to_remote(LOCATION_MAPPINGS, location, &mut channel)?;
    if path::get(&channel, "map.center.coordinates").is_some() {
        path::set(&mut channel, "map.center.type", Value::from("Point"));
    }
    mirror_address(&mut channel);

    let mut event = empty();
    mapping::apply_to_remote(SCHEDULE_MAPPINGS, schedule, &mut event)?;
    path::set(&mut event, "type", Value::from(defaults::RECURRING_EVENT_TYPE));
    path::set(&mut event, "recurrence.period", Value::from(defaults::RECURRENCE_PERIOD));
    path::set(&mut event, "recurrence.exclude", Value::Array(Vec::new()));
    path::set(
        &mut event,
        "recurrence.daySpecificTimes",
        Value::Array(weekly_to_remote(schedule)),
    );
    path::set(&mut channel, "events", Value::Array(vec![event]));

    mapping::apply_to_remote(REGISTRATION_MAPPINGS, registration, &mut channel)?;

    Ok(channel)
}

/// Copies the `fi` address, minus the street, into the other locales.
fn mirror_address(channel: &mut Value) {
    let at = format!("translations.{}.address", defaults::ADDRESS_LOCALE);
    let Some(Value::Object(address)) = path::get(channel, &at).cloned() else {
        return;
    };

    for locale in defaults::LOCALES
        .iter()
        .filter(|l| **l != defaults::ADDRESS_LOCALE)
    {
        let mut copy = address.clone();
        copy.remove("street");
        if *locale == "sv" {
            if let Some(Value::String(state)) = copy.get("state") {
                let sv = defaults::region_name_sv(state).to_string();
                copy.insert("state".into(), Value::String(sv));
            }
        }
        path::set(
            channel,
            &format!("translations.{}.address", locale),
            Value::Object(copy),
        );
    }
}

/// Reads a server channel back into local `location` and `schedule` sections.
///
/// Either section is `None` when nothing was mapped into it.
pub fn read_channel(channel: &Value) -> (Option<Value>, Option<Value>) {
    let mut location = empty();
    mapping::apply_to_local(LOCATION_MAPPINGS, channel, &mut location);

    let mut schedule = empty();
    if let Some(event) = path::get(channel, "events[0]") {
        mapping::apply_to_local(SCHEDULE_MAPPINGS, event, &mut schedule);
        if let Some(weekly) = weekly_from_remote(event) {
            path::set(&mut schedule, "weekly", Value::Array(weekly));
        }
    }

    let non_empty = |v: Value| (!is_empty_object(&v)).then_some(v);
    (non_empty(location), non_empty(schedule))
}

/// Reads the registration section carried by a server channel.
pub fn registration_from_channel(channel: &Value) -> Option<Value> {
    let mut registration = empty();
    mapping::apply_to_local(REGISTRATION_MAPPINGS, channel, &mut registration);
    (!is_empty_object(&registration)).then_some(registration)
}
