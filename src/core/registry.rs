//! Static registry of supported payload types.
//!
//! Powers the index and health endpoints and the "unknown type" error
//! message, so the list of types lives in exactly one place.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub struct TypeInfo {
    /// Fields that must be present for this type.
    pub required: &'static [&'static str],
    /// Optional fields recognised by this type.
    pub optional: &'static [&'static str],
    /// Example query string for the type's generation route.
    pub example: &'static str,
}

pub static TYPE_REGISTRY: Lazy<BTreeMap<&'static str, TypeInfo>> = Lazy::new(|| {
    let mut registry = BTreeMap::new();

    registry.insert(
        "url",
        TypeInfo {
            required: &["url"],
            optional: &[],
            example: "url=https://example.com",
        },
    );
    registry.insert(
        "text",
        TypeInfo {
            required: &["text"],
            optional: &[],
            example: "text=Hello%20World",
        },
    );
    registry.insert(
        "email",
        TypeInfo {
            required: &["to"],
            optional: &["subject", "body"],
            example: "to=a@b.com&subject=Hi",
        },
    );
    registry.insert(
        "sms",
        TypeInfo {
            required: &["phone"],
            optional: &["message"],
            example: "phone=%2B919999999999&message=Hello",
        },
    );
    registry.insert(
        "phone",
        TypeInfo {
            required: &["phone"],
            optional: &[],
            example: "phone=%2B919999999999",
        },
    );
    registry.insert(
        "wifi",
        TypeInfo {
            required: &["ssid"],
            optional: &["password", "encryption", "hidden"],
            example: "ssid=MyNetwork&password=secret&encryption=WPA",
        },
    );
    registry.insert(
        "vcard",
        TypeInfo {
            required: &["name"],
            optional: &["phone", "email", "org", "title", "url", "address", "note"],
            example: "name=Jane%20Doe&phone=%2B1234567890",
        },
    );
    registry.insert(
        "upi",
        TypeInfo {
            required: &["vpa"],
            optional: &["name", "amount", "currency", "note"],
            example: "vpa=merchant@upi&amount=100",
        },
    );
    registry.insert(
        "location",
        TypeInfo {
            required: &["lat", "lng"],
            optional: &["label"],
            example: "lat=28.6139&lng=77.2090",
        },
    );
    registry.insert(
        "whatsapp",
        TypeInfo {
            required: &["phone"],
            optional: &["message"],
            example: "phone=%2B919999999999&message=Hi",
        },
    );
    registry.insert(
        "event",
        TypeInfo {
            required: &["title", "start"],
            optional: &["end", "location", "description"],
            example: "title=Standup&start=20260301T090000Z",
        },
    );

    registry
});

/// Comma-separated list of every supported type name.
pub fn type_names() -> String {
    TYPE_REGISTRY
        .keys()
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}
