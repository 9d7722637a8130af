//! Fixed values the server expects when the author leaves something out.

/// Locales carried by translated fields.
pub const LOCALES: &[&str] = &["fi", "en", "sv"];

/// Locales an activity must be published in unless it says otherwise.
pub const REQUIRED_LOCALES: &[&str] = &["fi", "en"];

pub const ACTIVITY_TYPE: &str = "hobby";
pub const PRICING_TYPE: &str = "paid";
pub const LOCATION_TYPE: &str = "place";
pub const TIMEZONE: &str = "Europe/Helsinki";
pub const REGISTRATION_REQUIRED: bool = true;
pub const ACCESSIBILITY: &[&str] = &["ac_unknow"];

/// Event type code for a weekly recurring event.
pub const RECURRING_EVENT_TYPE: &str = "4";
pub const RECURRENCE_PERIOD: &str = "P1W";

/// Locale whose address translation holds the street address.
pub const ADDRESS_LOCALE: &str = "fi";

/// Contact descriptions used for locales the author did not fill in.
pub const CONTACT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("fi", "Lisätietoja"),
    ("en", "Details"),
    ("sv", "Detaljer"),
];

/// Swedish names of Finnish regions, used for the `sv` address copy.
pub const REGION_NAMES_SV: &[(&str, &str)] = &[
    ("Uusimaa", "Nyland"),
    ("Varsinais-Suomi", "Egentliga Finland"),
    ("Pohjanmaa", "Österbotten"),
    ("Keski-Pohjanmaa", "Mellersta Österbotten"),
    ("Kymenlaakso", "Kymmenedalen"),
    ("Pirkanmaa", "Birkaland"),
    ("Ahvenanmaa", "Åland"),
];

/// Fallback contact description for `locale`, if there is one.
pub fn contact_description(locale: &str) -> Option<&'static str> {
    CONTACT_DESCRIPTIONS
        .iter()
        .find(|(l, _)| *l == locale)
        .map(|(_, text)| *text)
}

/// Swedish region name for `state`, or `state` itself when unknown.
pub fn region_name_sv(state: &str) -> &str {
    REGION_NAMES_SV
        .iter()
        .find(|(fi, _)| *fi == state)
        .map(|(_, sv)| *sv)
        .unwrap_or(state)
}
