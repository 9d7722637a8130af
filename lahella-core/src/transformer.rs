//! Whole-record conversion between the authoring and wire schemas.

use serde_json::{json, Map, Value};

use crate::error::MappingError;
use crate::ids::{IdSource, UuidIds};
use crate::mapping::{self, FIELD_MAPPINGS};
use crate::path;
use crate::special;

/// Converts activity records in both directions.
///
/// Only the forward direction mints identifiers, drawn from `I`.
#[derive(Debug, Default, Clone)]
pub struct Transformer<I = UuidIds> {
    ids: I,
}

impl Transformer<UuidIds> {
    pub fn new() -> Self {
        Self { ids: UuidIds }
    }
}

impl<I: IdSource> Transformer<I> {
    pub fn with_ids(ids: I) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &I {
        &self.ids
    }

    /// Fails with the first required field missing from `local`.
    pub fn validate_required(&self, local: &Value) -> Result<(), MappingError> {
        mapping::validate_required(FIELD_MAPPINGS, local)
    }

    /// Builds the `{group, traits}` payload for a local record.
    pub fn local_to_remote(&self, local: &Value, group_id: &str) -> Result<Value, MappingError> {
        self.validate_required(local)?;

        let mut payload = json!({ "group": group_id, "traits": {} });
        mapping::apply_to_remote(FIELD_MAPPINGS, local, &mut payload)?;

        path::set(
            &mut payload,
            "traits.demographic",
            Value::Array(special::merge_demographics(local)),
        );
        if let Some(regions) = special::regions_to_remote(local) {
            path::set(&mut payload, "traits.region", Value::Array(regions));
        }
        path::set(
            &mut payload,
            "traits.contacts",
            Value::Array(special::contacts_to_remote(local, &self.ids)),
        );
        path::set(
            &mut payload,
            "traits.channels",
            Value::Array(self.build_channels(local)?),
        );

        Ok(payload)
    }

    fn build_channels(&self, local: &Value) -> Result<Vec<Value>, MappingError> {
        let empty = Value::Object(Map::new());
        let registration = path::get(local, "registration").unwrap_or(&empty);
        let schedule = path::get(local, "schedule");

        let Some(entries) = path::get(local, "channels").and_then(Value::as_array) else {
            let location = path::get(local, "location").unwrap_or(&empty);
            let channel = special::build_channel(
                location,
                schedule.unwrap_or(&empty),
                registration,
                &self.ids,
            )?;
            return Ok(vec![channel]);
        };

        if path::get(local, "location").is_some() {
            tracing::warn!("Record has both `channels` and `location`; using `channels`");
        }

        entries
            .iter()
            .map(|entry| {
                let location = path::get(entry, "location").unwrap_or(&empty);
                let schedule = path::get(entry, "schedule")
                    .or(schedule)
                    .unwrap_or(&empty);
                special::build_channel(location, schedule, registration, &self.ids)
            })
            .collect()
    }

    /// Converts a server activity back into the authoring schema.
    ///
    /// HTML strings are copied verbatim. A single channel is flattened into
    /// `location`/`schedule`; any other count becomes a `channels` list.
    /// Registration always comes from the first channel.
    pub fn remote_to_local(&self, remote: &Value) -> Value {
        let mut local = Value::Object(Map::new());

        if let Some(key) = path::get(remote, "_key") {
            path::set(&mut local, "_key", key.clone());
        }
        if let Some(status) = path::get(remote, "status") {
            path::set(&mut local, "_status", status.clone());
        }

        mapping::apply_to_local(FIELD_MAPPINGS, remote, &mut local);

        if let Some(demographics) = special::split_demographics(remote) {
            path::set(&mut local, "demographics", demographics);
        }

        let contacts = special::contacts_from_remote(remote);
        if !contacts.is_empty() {
            path::set(&mut local, "contacts.list", Value::Array(contacts));
        }

        let regions = path::get(remote, "traits.region").cloned();
        let Some(channels) = path::get(remote, "traits.channels").and_then(Value::as_array) else {
            return local;
        };

        if let [channel] = channels.as_slice() {
            let (location, schedule) = special::read_channel(channel);
            let location = with_regions(location, regions.as_ref());
            if let Some(location) = location {
                path::set(&mut local, "location", location);
            }
            if let Some(schedule) = schedule {
                path::set(&mut local, "schedule", schedule);
            }
        } else {
            let entries = channels
                .iter()
                .map(|channel| {
                    let (location, schedule) = special::read_channel(channel);
                    let mut entry = Map::new();
                    if let Some(location) = with_regions(location, regions.as_ref()) {
                        entry.insert("location".into(), location);
                    }
                    if let Some(schedule) = schedule {
                        entry.insert("schedule".into(), schedule);
                    }
                    Value::Object(entry)
                })
                .collect();
            path::set(&mut local, "channels", Value::Array(entries));
        }

        if let Some(registration) = channels.first().and_then(special::registration_from_channel) {
            path::set(&mut local, "registration", registration);
        }

        local
    }
}

fn with_regions(location: Option<Value>, regions: Option<&Value>) -> Option<Value> {
    let Some(regions) = regions else {
        return location;
    };
    let mut location = location.unwrap_or_else(|| Value::Object(Map::new()));
    path::set(&mut location, "regions", regions.clone());
    Some(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn transformer() -> Transformer<SequentialIds> {
        Transformer::with_ids(SequentialIds::new("id"))
    }

    fn minimal_sections() -> Value {
        json!({
            "title": {"fi": "Test"},
            "location": {"address": {"postal_code": "00100"}},
            "schedule": {"start_date": "2025-01-15", "end_date": "2025-05-15", "weekly": []},
            "registration": {"info": {"fi": "", "en": ""}}
        })
    }

    fn full_record() -> Value {
        json!({
            "title": {"fi": "Taiji-kurssi Lauttasaaressa", "en": "Tai chi course in Lauttasaari"},
            "type": "hobby",
            "required_locales": ["fi", "en"],
            "summary": {
                "fi": "<p dir=\"ltr\">Taiji-peruskurssi</p>",
                "en": "<p dir=\"ltr\">An elementary course in tai chi</p>"
            },
            "description": {
                "fi": "<p dir=\"ltr\">Peruskurssit.</p><p dir=\"ltr\">Rauhallisesti.</p>",
                "en": "<p dir=\"ltr\">For beginners.</p>"
            },
            "categories": {
                "themes": ["ht_hyvinvointi", "ht_urheilu"],
                "formats": ["hm_harrastukset"],
                "locales": ["fi-FI"]
            },
            "demographics": {
                "age_groups": ["ageGroup/range:18-29", "ageGroup/range:30-64"],
                "gender": ["gender/gender"]
            },
            "pricing": {
                "type": "paid",
                "info": {"fi": "<p dir=\"ltr\">195 euroa</p>", "en": "<p dir=\"ltr\">€195</p>"}
            },
            "image": {"id": "photo-1", "alt": "Tai chi in the park"},
            "location": {
                "type": "place",
                "regions": ["city/FI/Helsinki", "city/FI/Espoo"],
                "accessibility": ["ac_unknow"],
                "address": {
                    "street": "Myllykalliontie 3",
                    "postal_code": "00200",
                    "city": "Helsinki",
                    "state": "Uusimaa",
                    "country": "FI",
                    "coordinates": [24.87076, 60.16061],
                    "zoom": 16
                },
                "summary": {"fi": "<p dir=\"ltr\">Ala-asteella</p>", "en": "<p dir=\"ltr\">At the school</p>"}
            },
            "schedule": {
                "timezone": "Europe/Helsinki",
                "start_date": "2026-01-11",
                "end_date": "2026-05-24",
                "weekly": [{"weekday": 7, "start_time": "11:00", "end_time": "12:00"}]
            },
            "registration": {
                "required": true,
                "url": "https://taichichuan.fi/kurssit",
                "email": "teacher@example.com",
                "info": {"fi": "<p dir=\"ltr\">Ilmoittaudu</p>", "en": "<p dir=\"ltr\">Enrol</p>"}
            },
            "contacts": {
                "list": [
                    {"type": "www", "value": "https://taichichuan.fi", "description": {"fi": "Lisätietoja", "en": "Details"}},
                    {"type": "email", "value": "teacher@example.com", "description": {"fi": "Sähköposti", "en": "Email"}}
                ]
            }
        })
    }

    #[test]
    fn test_validate_required() {
        let t = transformer();
        let err = t.validate_required(&json!({})).unwrap_err();
        assert!(err.to_string().contains("title.fi"));
        assert!(t.validate_required(&json!({"title": {"fi": "Test Course"}})).is_ok());
    }

    #[test]
    fn test_local_to_remote_fails_before_output() {
        let err = transformer()
            .local_to_remote(&json!({"title": {"en": "Only English"}}), "g")
            .unwrap_err();
        assert_eq!(err, MappingError::missing("title.fi"));
    }

    #[test]
    fn test_basic_conversion() {
        let local = json!({
            "title": {"fi": "Testikurssi", "en": "Test Course"},
            "type": "hobby",
            "location": {"type": "place", "address": {"street": "Test Street", "postal_code": "00100"}},
            "schedule": {
                "start_date": "2025-01-15",
                "end_date": "2025-05-15",
                "weekly": [{"weekday": 2, "start_time": "18:00", "end_time": "19:30"}]
            },
            "registration": {"required": true, "info": {"fi": "Info", "en": "Info"}}
        });
        let result = transformer().local_to_remote(&local, "123").unwrap();

        assert_eq!(result["group"], json!("123"));
        assert_eq!(result["traits"]["translations"]["fi"]["name"], json!("Testikurssi"));
        assert_eq!(result["traits"]["translations"]["en"]["name"], json!("Test Course"));
        assert_eq!(result["traits"]["type"], json!("hobby"));
        assert_eq!(result["traits"]["channels"].as_array().unwrap().len(), 1);
        assert_eq!(result.get("_key"), None);
    }

    #[test]
    fn test_summary_passed_through() {
        let mut local = minimal_sections();
        local["summary"] = json!({"fi": "<p dir=\"ltr\">Kurssin kuvaus</p>"});
        let result = transformer().local_to_remote(&local, "g").unwrap();
        assert_eq!(
            result["traits"]["translations"]["fi"]["summary"],
            json!("<p dir=\"ltr\">Kurssin kuvaus</p>")
        );
    }

    #[test]
    fn test_pricing_wrapped_and_defaulted() {
        let mut local = minimal_sections();
        local["pricing"] = json!({"type": "free"});
        let result = transformer().local_to_remote(&local, "g").unwrap();
        assert_eq!(result["traits"]["pricing"], json!(["free"]));

        let result = transformer().local_to_remote(&minimal_sections(), "g").unwrap();
        assert_eq!(result["traits"]["pricing"], json!(["paid"]));
    }

    #[test]
    fn test_demographics_and_contacts_always_present() {
        let result = transformer().local_to_remote(&minimal_sections(), "g").unwrap();
        assert_eq!(result["traits"]["demographic"], json!([]));
        assert_eq!(result["traits"]["contacts"], json!([]));
    }

    #[test]
    fn test_multi_channel_mode() {
        let local = json!({
            "title": {"fi": "Test"},
            "channels": [
                {
                    "location": {"address": {"street": "Street 1", "postal_code": "00100"}, "regions": ["city/FI/Helsinki"]},
                    "schedule": {"start_date": "2025-01-15", "end_date": "2025-05-15",
                                 "weekly": [{"weekday": 2, "start_time": "18:00", "end_time": "19:30"}]}
                },
                {
                    "location": {"address": {"street": "Street 2", "postal_code": "00200"}, "regions": ["city/FI/Espoo"]},
                    "schedule": {"start_date": "2025-01-16", "end_date": "2025-05-16",
                                 "weekly": [{"weekday": 5, "start_time": "17:00", "end_time": "18:30"}]}
                }
            ],
            "registration": {"required": false, "url": "https://example.com"}
        });
        let result = transformer().local_to_remote(&local, "g").unwrap();
        let channels = result["traits"]["channels"].as_array().unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0]["id"], json!("id-1"));
        assert_eq!(channels[1]["id"], json!("id-2"));
        assert_eq!(channels[1]["translations"]["fi"]["address"]["street"], json!("Street 2"));
        assert_eq!(channels[1]["registrationRequired"], json!(false));
        assert_eq!(channels[1]["registrationUrl"], json!("https://example.com"));
        assert_eq!(
            result["traits"]["region"],
            json!(["city/FI/Helsinki", "city/FI/Espoo"])
        );
    }

    #[test]
    fn test_multi_channel_falls_back_to_shared_schedule() {
        let local = json!({
            "title": {"fi": "Multi"},
            "channels": [
                {"location": {"address": {"street": "Location A"}}},
                {"location": {"address": {"street": "Location B"}}}
            ],
            "schedule": {"start_date": "2025-01-15", "end_date": "2025-06-15"}
        });
        let result = transformer().local_to_remote(&local, "g").unwrap();
        let channels = result["traits"]["channels"].as_array().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0]["events"][0]["start"], channels[1]["events"][0]["start"]);
        assert!(channels[1]["events"][0]["start"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_remote_to_local_basic() {
        let remote = json!({
            "_key": "12345",
            "status": "published",
            "traits": {
                "type": "hobby",
                "requiredLocales": ["fi", "en"],
                "translations": {
                    "fi": {"name": "Testikurssi", "summary": "<p dir=\"ltr\">Kuvaus</p>"},
                    "en": {"name": "Test Course", "summary": "<p dir=\"ltr\">Description</p>"}
                },
                "theme": ["ht_urheilu"],
                "format": ["hm_harrastukset"],
                "pricing": ["paid"],
                "channels": [{
                    "type": ["place"],
                    "accessibility": ["ac_unknow"],
                    "translations": {"fi": {"address": {
                        "street": "Test Street", "postalCode": "00100", "city": "Helsinki",
                        "state": "Uusimaa", "country": "FI"
                    }}},
                    "events": [{
                        "start": 1736899200000_i64,
                        "timeZone": "Europe/Helsinki",
                        "recurrence": {
                            "end": 1747267200000_i64,
                            "daySpecificTimes": [{"weekday": 2, "startTime": "18:00", "endTime": "19:30"}]
                        }
                    }]
                }]
            }
        });
        let result = transformer().remote_to_local(&remote);

        assert_eq!(result["_key"], json!("12345"));
        assert_eq!(result["_status"], json!("published"));
        assert_eq!(result["title"]["fi"], json!("Testikurssi"));
        assert_eq!(result["summary"]["fi"], json!("<p dir=\"ltr\">Kuvaus</p>"));
        assert_eq!(result["pricing"]["type"], json!("paid"));
        assert_eq!(result["categories"]["themes"], json!(["ht_urheilu"]));
        assert_eq!(result["location"]["type"], json!("place"));
        assert_eq!(result["location"]["address"]["postal_code"], json!("00100"));
        assert_eq!(
            result["schedule"]["weekly"],
            json!([{"weekday": 2, "start_time": "18:00", "end_time": "19:30"}])
        );
        assert_eq!(result.get("channels"), None);
    }

    #[test]
    fn test_remote_to_local_preserves_html() {
        let remote = json!({
            "traits": {
                "translations": {"fi": {
                    "name": "Test",
                    "description": "<p dir=\"ltr\"><strong>Bold</strong> text</p>"
                }},
                "channels": []
            }
        });
        let result = transformer().remote_to_local(&remote);
        assert_eq!(
            result["description"]["fi"],
            json!("<p dir=\"ltr\"><strong>Bold</strong> text</p>")
        );
        assert_eq!(result["channels"], json!([]));
        assert_eq!(result.get("location"), None);
    }

    #[test]
    fn test_remote_to_local_multi_channel() {
        let channel = |postal: &str, required: bool| {
            json!({
                "type": ["place"],
                "accessibility": ["ac_unknow"],
                "translations": {"fi": {"address": {"postalCode": postal, "city": "Helsinki"}}},
                "events": [{"start": 1736899200000_i64, "recurrence": {"end": 1747267200000_i64, "daySpecificTimes": []}}],
                "registrationRequired": required
            })
        };
        let remote = json!({
            "traits": {
                "translations": {"fi": {"name": "Test"}},
                "region": ["city/FI/Helsinki"],
                "channels": [channel("00100", false), channel("00200", true)]
            }
        });
        let result = transformer().remote_to_local(&remote);

        let channels = result["channels"].as_array().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[1]["location"]["address"]["postal_code"], json!("00200"));
        assert_eq!(channels[1]["location"]["regions"], json!(["city/FI/Helsinki"]));
        assert_eq!(result["registration"]["required"], json!(false));
        assert_eq!(result.get("location"), None);
        assert_eq!(result.get("schedule"), None);
    }

    #[test]
    fn test_round_trip_full_record() {
        let t = transformer();
        let original = full_record();
        let remote = t.local_to_remote(&original, "test-group").unwrap();
        assert_eq!(t.remote_to_local(&remote), original);
    }

    #[test]
    fn test_round_trip_multi_channel() {
        let t = transformer();
        let original = json!({
            "title": {"fi": "Kaksi paikkaa"},
            "type": "hobby",
            "required_locales": ["fi", "en"],
            "pricing": {"type": "free"},
            "channels": [
                {
                    "location": {
                        "type": "place",
                        "regions": ["city/FI/Helsinki"],
                        "accessibility": ["ac_unknow"],
                        "address": {"street": "Katu 1", "city": "Helsinki"}
                    },
                    "schedule": {
                        "timezone": "Europe/Helsinki",
                        "start_date": "2025-09-01",
                        "end_date": "2025-12-15",
                        "weekly": [{"weekday": 1, "start_time": "18:00", "end_time": "19:00"}]
                    }
                },
                {
                    "location": {
                        "type": "online",
                        "regions": ["city/FI/Helsinki"],
                        "accessibility": ["ac_unknow"]
                    },
                    "schedule": {
                        "timezone": "Europe/Helsinki",
                        "start_date": "2025-09-03",
                        "end_date": "2025-12-17",
                        "weekly": []
                    }
                }
            ],
            "registration": {"required": true, "email": "info@example.com"}
        });
        let remote = t.local_to_remote(&original, "g").unwrap();
        assert_eq!(t.remote_to_local(&remote), original);
    }
}
