//! Update payloads that keep the identifiers the server already issued.

use serde_json::Value;

use crate::error::MappingError;
use crate::ids::IdSource;
use crate::path;
use crate::transformer::Transformer;

/// Builds the payload for updating `server` with the contents of `local`.
///
/// Channels take the server id at the same position; contacts take the id of
/// the server contact with the same `(type, value)`. Anything unmatched gets a
/// fresh id. `_key` is never part of the body.
pub fn build_update<I: IdSource>(
    transformer: &Transformer<I>,
    local: &Value,
    server: &Value,
    group_id: &str,
    new_photo_id: Option<&str>,
) -> Result<Value, MappingError> {
    let mut payload = transformer.local_to_remote(local, group_id)?;

    reuse_channel_ids(&mut payload, server);
    reuse_contact_ids(&mut payload, server, transformer.ids());
    resolve_photo(&mut payload, local, server, new_photo_id);

    if let Some(obj) = payload.as_object_mut() {
        obj.remove("_key");
    }
    Ok(payload)
}

fn server_list<'a>(server: &'a Value, at: &str) -> &'a [Value] {
    path::get(server, at)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn reuse_channel_ids(payload: &mut Value, server: &Value) {
    let existing = server_list(server, "traits.channels");
    let Some(channels) = payload
        .pointer_mut("/traits/channels")
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for (channel, old) in channels.iter_mut().zip(existing) {
        if let Some(id) = old.get("id").filter(|id| !id.is_null()) {
            path::set(channel, "id", id.clone());
        }
    }
}

fn reuse_contact_ids(payload: &mut Value, server: &Value, ids: &dyn IdSource) {
    let existing = server_list(server, "traits.contacts");
    let Some(contacts) = payload
        .pointer_mut("/traits/contacts")
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for contact in contacts.iter_mut() {
        let matched = existing.iter().find(|old| {
            old.get("type") == contact.get("type") && old.get("value") == contact.get("value")
        });
        let id = match matched.and_then(|old| old.get("id")) {
            Some(id) => id.clone(),
            None => Value::String(ids.next_id()),
        };
        path::set(contact, "id", id);
    }
}

fn resolve_photo(payload: &mut Value, local: &Value, server: &Value, new_photo_id: Option<&str>) {
    if let Some(id) = new_photo_id {
        path::set(payload, "traits.photo", Value::from(id));
        return;
    }
    if path::get_str(local, "image.id").is_some_and(|id| !id.is_empty()) {
        return;
    }

    let server_photo = path::get(server, "traits.photo").filter(|p| !p.is_null());
    let wants_upload = path::get(local, "image.path").is_some_and(|p| !p.is_null());
    match server_photo {
        Some(photo) if !wants_upload => {
            path::set(payload, "traits.photo", photo.clone());
        }
        _ => {
            if let Some(traits) = payload.get_mut("traits").and_then(Value::as_object_mut) {
                traits.remove("photo");
            }
        }
    }
}
