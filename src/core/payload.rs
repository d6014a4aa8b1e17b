//! Payload construction and validation.
//!
//! Each payload type has a parser that lifts a loosely-typed field bag into
//! a typed [`PayloadRequest`] variant (required-field checks before format
//! checks), and a pure wire-format builder that renders the variant into the
//! exact string a scanner app expects. A malformed payload produces a QR
//! code that scanners silently misinterpret, so the wire grammar here is
//! load-bearing.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::core::error::QrError;
use crate::core::options::EcLevel;

pub const MAX_TEXT_CHARS: usize = 2000;

/// Characters escaped when embedding a value in a payload query component.
/// Mirrors what browsers escape for URI components.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// The supported payload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Url,
    Text,
    Email,
    Sms,
    Phone,
    Wifi,
    Vcard,
    Upi,
    Location,
    Whatsapp,
    Event,
}

impl PayloadKind {
    pub fn parse(name: &str) -> Result<Self, QrError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(PayloadKind::Url),
            "text" => Ok(PayloadKind::Text),
            "email" => Ok(PayloadKind::Email),
            "sms" => Ok(PayloadKind::Sms),
            "phone" => Ok(PayloadKind::Phone),
            "wifi" => Ok(PayloadKind::Wifi),
            "vcard" => Ok(PayloadKind::Vcard),
            "upi" => Ok(PayloadKind::Upi),
            "location" => Ok(PayloadKind::Location),
            "whatsapp" => Ok(PayloadKind::Whatsapp),
            "event" => Ok(PayloadKind::Event),
            other => Err(QrError::InvalidType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Url => "url",
            PayloadKind::Text => "text",
            PayloadKind::Email => "email",
            PayloadKind::Sms => "sms",
            PayloadKind::Phone => "phone",
            PayloadKind::Wifi => "wifi",
            PayloadKind::Vcard => "vcard",
            PayloadKind::Upi => "upi",
            PayloadKind::Location => "location",
            PayloadKind::Whatsapp => "whatsapp",
            PayloadKind::Event => "event",
        }
    }

    /// vCard payloads are dense; they always ride at the highest
    /// error-correction level, overriding whatever the caller asked for.
    pub fn forced_ec_level(&self) -> Option<EcLevel> {
        match self {
            PayloadKind::Vcard => Some(EcLevel::H),
            _ => None,
        }
    }
}

/// Loosely-typed field bag, as received from query params or a bulk item's
/// `data` object. String, number, and boolean values are all readable as
/// strings; blank strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Fields(map.clone()),
            _ => Fields(Map::new()),
        }
    }

    /// Build a bag from named optional values, skipping absent ones.
    pub fn from_pairs(pairs: &[(&str, &Option<String>)]) -> Self {
        let mut map = Map::new();
        for (key, value) in pairs {
            if let Some(v) = value {
                map.insert((*key).to_string(), Value::String(v.clone()));
            }
        }
        Fields(map)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Field value as a string, or `None` when absent or blank.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self.0.get(key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn require(&self, key: &str, example: &str) -> Result<String, QrError> {
        self.get(key).ok_or_else(|| QrError::missing(key, example))
    }

    fn flag(&self, key: &str) -> bool {
        matches!(
            self.get(key).as_deref().map(str::trim),
            Some(s) if s.eq_ignore_ascii_case("true") || s == "1"
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiEncryption {
    Wpa,
    Wep,
    Nopass,
}

impl WifiEncryption {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("wep") => WifiEncryption::Wep,
            Some(s) if s.eq_ignore_ascii_case("nopass") => WifiEncryption::Nopass,
            _ => WifiEncryption::Wpa,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::Nopass => "nopass",
        }
    }
}

/// A validated request, one variant per payload type. All required-field and
/// format checks happen in [`PayloadRequest::parse`]; building the payload
/// string from a variant cannot fail.
#[derive(Debug, Clone)]
pub enum PayloadRequest {
    Url {
        url: String,
    },
    Text {
        text: String,
    },
    Email {
        to: String,
        subject: Option<String>,
        body: Option<String>,
    },
    Sms {
        phone: String,
        message: Option<String>,
    },
    Phone {
        phone: String,
    },
    Wifi {
        ssid: String,
        password: Option<String>,
        encryption: WifiEncryption,
        hidden: bool,
    },
    Vcard {
        name: String,
        phone: Option<String>,
        email: Option<String>,
        org: Option<String>,
        title: Option<String>,
        url: Option<String>,
        address: Option<String>,
        note: Option<String>,
    },
    Upi {
        vpa: String,
        name: Option<String>,
        amount: Option<String>,
        currency: Option<String>,
        note: Option<String>,
    },
    Location {
        lat: f64,
        lng: f64,
        label: Option<String>,
    },
    Whatsapp {
        phone: String,
        message: Option<String>,
    },
    Event {
        title: String,
        start: String,
        end: Option<String>,
        location: Option<String>,
        description: Option<String>,
    },
}

/// The text that ends up inside the QR symbol, plus its kind.
#[derive(Debug, Clone)]
pub struct Payload {
    pub kind: PayloadKind,
    pub text: String,
}

impl PayloadRequest {
    pub fn parse(kind: PayloadKind, fields: &Fields) -> Result<Self, QrError> {
        match kind {
            PayloadKind::Url => {
                let url = fields.require("url", "https://example.com")?;
                let parsed = Url::parse(url.trim()).map_err(|_| {
                    QrError::validation("url", "must be a valid URL starting with http:// or https://")
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(QrError::validation(
                        "url",
                        "scheme must be http:// or https://",
                    ));
                }
                Ok(PayloadRequest::Url { url })
            }
            PayloadKind::Text => {
                let text = fields.require("text", "Hello")?;
                if text.chars().count() > MAX_TEXT_CHARS {
                    return Err(QrError::validation(
                        "text",
                        format!("must be at most {MAX_TEXT_CHARS} characters"),
                    ));
                }
                Ok(PayloadRequest::Text { text })
            }
            PayloadKind::Email => {
                let to = fields.require("to", "someone@example.com")?;
                if !to.contains('@') {
                    return Err(QrError::validation(
                        "to",
                        "must be an email address containing `@`",
                    ));
                }
                Ok(PayloadRequest::Email {
                    to,
                    subject: fields.get("subject"),
                    body: fields.get("body"),
                })
            }
            PayloadKind::Sms => Ok(PayloadRequest::Sms {
                phone: fields.require("phone", "+919999999999")?,
                message: fields.get("message"),
            }),
            PayloadKind::Phone => Ok(PayloadRequest::Phone {
                phone: fields.require("phone", "+919999999999")?,
            }),
            PayloadKind::Wifi => Ok(PayloadRequest::Wifi {
                ssid: fields.require("ssid", "MyNetwork")?,
                password: fields.get("password"),
                encryption: WifiEncryption::parse(fields.get("encryption").as_deref()),
                hidden: fields.flag("hidden"),
            }),
            PayloadKind::Vcard => Ok(PayloadRequest::Vcard {
                name: fields.require("name", "Jane Doe")?,
                phone: fields.get("phone"),
                email: fields.get("email"),
                org: fields.get("org"),
                title: fields.get("title"),
                url: fields.get("url"),
                address: fields.get("address"),
                note: fields.get("note"),
            }),
            PayloadKind::Upi => {
                let vpa = fields.require("vpa", "merchant@upi")?;
                if !vpa.contains('@') {
                    return Err(QrError::validation(
                        "vpa",
                        "must be a virtual payment address containing `@`",
                    ));
                }
                Ok(PayloadRequest::Upi {
                    vpa,
                    name: fields.get("name"),
                    amount: fields.get("amount"),
                    currency: fields.get("currency"),
                    note: fields.get("note"),
                })
            }
            PayloadKind::Location => {
                let lat = parse_coordinate(fields, "lat", "28.6139", -90.0, 90.0)?;
                let lng = parse_coordinate(fields, "lng", "77.2090", -180.0, 180.0)?;
                Ok(PayloadRequest::Location {
                    lat,
                    lng,
                    label: fields.get("label"),
                })
            }
            PayloadKind::Whatsapp => Ok(PayloadRequest::Whatsapp {
                phone: fields.require("phone", "+919999999999")?,
                message: fields.get("message"),
            }),
            PayloadKind::Event => Ok(PayloadRequest::Event {
                title: fields.require("title", "Standup")?,
                start: fields.require("start", "20260301T090000Z")?,
                end: fields.get("end"),
                location: fields.get("location"),
                description: fields.get("description"),
            }),
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            PayloadRequest::Url { .. } => PayloadKind::Url,
            PayloadRequest::Text { .. } => PayloadKind::Text,
            PayloadRequest::Email { .. } => PayloadKind::Email,
            PayloadRequest::Sms { .. } => PayloadKind::Sms,
            PayloadRequest::Phone { .. } => PayloadKind::Phone,
            PayloadRequest::Wifi { .. } => PayloadKind::Wifi,
            PayloadRequest::Vcard { .. } => PayloadKind::Vcard,
            PayloadRequest::Upi { .. } => PayloadKind::Upi,
            PayloadRequest::Location { .. } => PayloadKind::Location,
            PayloadRequest::Whatsapp { .. } => PayloadKind::Whatsapp,
            PayloadRequest::Event { .. } => PayloadKind::Event,
        }
    }

    /// Render the wire-format payload string. Total over validated input.
    pub fn to_payload(&self) -> Payload {
        let text = match self {
            PayloadRequest::Url { url } => url.clone(),
            PayloadRequest::Text { text } => text.clone(),
            PayloadRequest::Email { to, subject, body } => {
                mailto_uri(to, subject.as_deref(), body.as_deref())
            }
            PayloadRequest::Sms { phone, message } => sms_uri(phone, message.as_deref()),
            PayloadRequest::Phone { phone } => format!("tel:{phone}"),
            PayloadRequest::Wifi {
                ssid,
                password,
                encryption,
                hidden,
            } => wifi_string(ssid, password.as_deref(), *encryption, *hidden),
            PayloadRequest::Vcard {
                name,
                phone,
                email,
                org,
                title,
                url,
                address,
                note,
            } => vcard_block(
                name,
                phone.as_deref(),
                email.as_deref(),
                org.as_deref(),
                title.as_deref(),
                url.as_deref(),
                address.as_deref(),
                note.as_deref(),
            ),
            PayloadRequest::Upi {
                vpa,
                name,
                amount,
                currency,
                note,
            } => upi_uri(
                vpa,
                name.as_deref(),
                amount.as_deref(),
                currency.as_deref(),
                note.as_deref(),
            ),
            PayloadRequest::Location { lat, lng, label } => {
                location_uri(*lat, *lng, label.as_deref())
            }
            PayloadRequest::Whatsapp { phone, message } => wa_me_uri(phone, message.as_deref()),
            PayloadRequest::Event {
                title,
                start,
                end,
                location,
                description,
            } => vevent_block(
                title,
                start,
                end.as_deref(),
                location.as_deref(),
                description.as_deref(),
            ),
        };
        Payload {
            kind: self.kind(),
            text,
        }
    }
}

fn parse_coordinate(
    fields: &Fields,
    key: &str,
    example: &str,
    min: f64,
    max: f64,
) -> Result<f64, QrError> {
    let raw = fields.require(key, example)?;
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| QrError::validation(key, "must be numeric"))?;
    if !(min..=max).contains(&value) {
        return Err(QrError::validation(
            key,
            format!("must be between {min} and {max}"),
        ));
    }
    Ok(value)
}

fn mailto_uri(to: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let mut params = Vec::new();
    if let Some(subject) = subject {
        params.push(format!("subject={}", encode_component(subject)));
    }
    if let Some(body) = body {
        params.push(format!("body={}", encode_component(body)));
    }
    if params.is_empty() {
        format!("mailto:{to}")
    } else {
        format!("mailto:{to}?{}", params.join("&"))
    }
}

fn sms_uri(phone: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("sms:{phone}?body={}", encode_component(message)),
        None => format!("sms:{phone}"),
    }
}

fn wifi_string(
    ssid: &str,
    password: Option<&str>,
    encryption: WifiEncryption,
    hidden: bool,
) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};H:{};",
        encryption.token(),
        ssid,
        password.unwrap_or(""),
        hidden
    )
}

/// vCard 3.0. The `N:` line reverses the whitespace-separated name tokens,
/// so "Jane Q Doe" becomes "Doe;Q;Jane".
#[allow(clippy::too_many_arguments)]
fn vcard_block(
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
    org: Option<&str>,
    title: Option<&str>,
    url: Option<&str>,
    address: Option<&str>,
    note: Option<&str>,
) -> String {
    let reversed: Vec<&str> = name.split_whitespace().rev().collect();

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{name}"),
        format!("N:{}", reversed.join(";")),
    ];
    if let Some(phone) = phone {
        lines.push(format!("TEL:{phone}"));
    }
    if let Some(email) = email {
        lines.push(format!("EMAIL:{email}"));
    }
    if let Some(org) = org {
        lines.push(format!("ORG:{org}"));
    }
    if let Some(title) = title {
        lines.push(format!("TITLE:{title}"));
    }
    if let Some(url) = url {
        lines.push(format!("URL:{url}"));
    }
    if let Some(address) = address {
        lines.push(format!("ADR:{address}"));
    }
    if let Some(note) = note {
        lines.push(format!("NOTE:{note}"));
    }
    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

fn upi_uri(
    vpa: &str,
    name: Option<&str>,
    amount: Option<&str>,
    currency: Option<&str>,
    note: Option<&str>,
) -> String {
    let mut uri = format!("upi://pay?pa={vpa}");
    if let Some(name) = name {
        uri.push_str(&format!("&pn={}", encode_component(name)));
    }
    if let Some(amount) = amount {
        uri.push_str(&format!("&am={amount}"));
    }
    // Currency only means something alongside an amount, or when given
    // explicitly. Pass-through, not validated as an ISO code.
    if amount.is_some() || currency.is_some() {
        uri.push_str(&format!("&cu={}", currency.unwrap_or("INR")));
    }
    if let Some(note) = note {
        uri.push_str(&format!("&tn={}", encode_component(note)));
    }
    uri
}

fn location_uri(lat: f64, lng: f64, label: Option<&str>) -> String {
    match label {
        Some(label) => format!(
            "https://maps.google.com?q={lat},{lng}&label={}",
            encode_component(label)
        ),
        None => format!("geo:{lat},{lng}"),
    }
}

fn wa_me_uri(phone: &str, message: Option<&str>) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match message {
        Some(message) => format!("https://wa.me/{digits}?text={}", encode_component(message)),
        None => format!("https://wa.me/{digits}"),
    }
}

fn vevent_block(
    title: &str,
    start: &str,
    end: Option<&str>,
    location: Option<&str>,
    description: Option<&str>,
) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{title}"),
        format!("DTSTART:{start}"),
    ];
    if let Some(end) = end {
        lines.push(format!("DTEND:{end}"));
    }
    if let Some(location) = location {
        lines.push(format!("LOCATION:{location}"));
    }
    if let Some(description) = description {
        lines.push(format!("DESCRIPTION:{description}"));
    }
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(kind: PayloadKind, fields: serde_json::Value) -> Result<Payload, QrError> {
        PayloadRequest::parse(kind, &Fields::from_value(&fields)).map(|r| r.to_payload())
    }

    #[test]
    fn url_passes_through_verbatim() {
        let payload = parse(PayloadKind::Url, json!({"url": "https://example.com"})).unwrap();
        assert_eq!(payload.text, "https://example.com");
        assert_eq!(payload.kind, PayloadKind::Url);
    }

    #[test]
    fn url_rejects_non_http_scheme() {
        let err = parse(PayloadKind::Url, json!({"url": "ftp://x"})).unwrap_err();
        assert!(err.to_string().contains("scheme"), "got: {err}");
    }

    #[test]
    fn url_rejects_missing_field() {
        let err = parse(PayloadKind::Url, json!({})).unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn text_verbatim_and_length_capped() {
        let payload = parse(PayloadKind::Text, json!({"text": "hello world"})).unwrap();
        assert_eq!(payload.text, "hello world");

        let long = "x".repeat(2001);
        assert!(parse(PayloadKind::Text, json!({"text": long})).is_err());
        let exactly = "x".repeat(2000);
        assert!(parse(PayloadKind::Text, json!({"text": exactly})).is_ok());
    }

    #[test]
    fn text_blank_counts_as_missing() {
        assert!(parse(PayloadKind::Text, json!({"text": "   "})).is_err());
    }

    #[test]
    fn email_with_subject() {
        let payload = parse(
            PayloadKind::Email,
            json!({"to": "a@b.com", "subject": "Hi"}),
        )
        .unwrap();
        assert_eq!(payload.text, "mailto:a@b.com?subject=Hi");
    }

    #[test]
    fn email_encodes_subject_and_body() {
        let payload = parse(
            PayloadKind::Email,
            json!({"to": "a@b.com", "subject": "Hello there", "body": "A & B"}),
        )
        .unwrap();
        assert_eq!(
            payload.text,
            "mailto:a@b.com?subject=Hello%20there&body=A%20%26%20B"
        );
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(parse(PayloadKind::Email, json!({"to": "notanemail"})).is_err());
    }

    #[test]
    fn sms_with_and_without_body() {
        let payload = parse(PayloadKind::Sms, json!({"phone": "+15551234"})).unwrap();
        assert_eq!(payload.text, "sms:+15551234");

        let payload = parse(
            PayloadKind::Sms,
            json!({"phone": "+15551234", "message": "on my way"}),
        )
        .unwrap();
        assert_eq!(payload.text, "sms:+15551234?body=on%20my%20way");
    }

    #[test]
    fn phone_uses_tel_scheme() {
        let payload = parse(PayloadKind::Phone, json!({"phone": "+15551234"})).unwrap();
        assert_eq!(payload.text, "tel:+15551234");
    }

    #[test]
    fn wifi_defaults_to_wpa() {
        let payload = parse(
            PayloadKind::Wifi,
            json!({"ssid": "MyNetwork", "password": "secret"}),
        )
        .unwrap();
        assert_eq!(payload.text, "WIFI:T:WPA;S:MyNetwork;P:secret;H:false;");
    }

    #[test]
    fn wifi_encryption_coerced_case_insensitively() {
        let payload = parse(
            PayloadKind::Wifi,
            json!({"ssid": "n", "encryption": "wep", "hidden": "true"}),
        )
        .unwrap();
        assert_eq!(payload.text, "WIFI:T:WEP;S:n;P:;H:true;");

        let payload = parse(
            PayloadKind::Wifi,
            json!({"ssid": "n", "encryption": "NOPASS"}),
        )
        .unwrap();
        assert_eq!(payload.text, "WIFI:T:nopass;S:n;P:;H:false;");

        // Unrecognised values fall back to WPA.
        let payload = parse(
            PayloadKind::Wifi,
            json!({"ssid": "n", "encryption": "wpa3"}),
        )
        .unwrap();
        assert!(payload.text.starts_with("WIFI:T:WPA;"));
    }

    #[test]
    fn vcard_reverses_name_tokens() {
        let payload = parse(PayloadKind::Vcard, json!({"name": "Jane Q Doe"})).unwrap();
        assert_eq!(
            payload.text,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Q Doe\nN:Doe;Q;Jane\nEND:VCARD"
        );
    }

    #[test]
    fn vcard_optional_lines_only_when_present() {
        let payload = parse(
            PayloadKind::Vcard,
            json!({"name": "Jane Doe", "phone": "+123", "org": "Acme"}),
        )
        .unwrap();
        assert!(payload.text.contains("TEL:+123"));
        assert!(payload.text.contains("ORG:Acme"));
        assert!(!payload.text.contains("EMAIL:"));
        assert!(!payload.text.contains("NOTE:"));
    }

    #[test]
    fn vcard_forces_high_error_correction() {
        assert_eq!(
            PayloadKind::Vcard.forced_ec_level(),
            Some(crate::core::options::EcLevel::H)
        );
        assert_eq!(PayloadKind::Url.forced_ec_level(), None);
    }

    #[test]
    fn upi_minimal() {
        let payload = parse(PayloadKind::Upi, json!({"vpa": "merchant@upi"})).unwrap();
        assert_eq!(payload.text, "upi://pay?pa=merchant@upi");
    }

    #[test]
    fn upi_amount_brings_default_currency() {
        let payload = parse(
            PayloadKind::Upi,
            json!({"vpa": "m@upi", "name": "A Shop", "amount": "150.50"}),
        )
        .unwrap();
        assert_eq!(
            payload.text,
            "upi://pay?pa=m@upi&pn=A%20Shop&am=150.50&cu=INR"
        );
    }

    #[test]
    fn upi_requires_at_sign() {
        assert!(parse(PayloadKind::Upi, json!({"vpa": "nope"})).is_err());
    }

    #[test]
    fn location_geo_uri_uses_float_display() {
        let payload = parse(
            PayloadKind::Location,
            json!({"lat": "28.6139", "lng": "77.2090"}),
        )
        .unwrap();
        assert_eq!(payload.text, "geo:28.6139,77.209");
    }

    #[test]
    fn location_with_label_uses_maps_link() {
        let payload = parse(
            PayloadKind::Location,
            json!({"lat": "12.5", "lng": "-70.0", "label": "Home Base"}),
        )
        .unwrap();
        assert_eq!(
            payload.text,
            "https://maps.google.com?q=12.5,-70&label=Home%20Base"
        );
    }

    #[test]
    fn location_rejects_out_of_range() {
        let err = parse(PayloadKind::Location, json!({"lat": "91", "lng": "0"})).unwrap_err();
        assert!(err.to_string().contains("lat"));

        let err = parse(PayloadKind::Location, json!({"lat": "0", "lng": "181"})).unwrap_err();
        assert!(err.to_string().contains("lng"));
    }

    #[test]
    fn location_rejects_non_numeric() {
        let err = parse(
            PayloadKind::Location,
            json!({"lat": "north", "lng": "77"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn whatsapp_strips_non_digits() {
        let payload = parse(
            PayloadKind::Whatsapp,
            json!({"phone": "+91 99999-99999"}),
        )
        .unwrap();
        assert_eq!(payload.text, "https://wa.me/919999999999");

        let payload = parse(
            PayloadKind::Whatsapp,
            json!({"phone": "+1 555", "message": "hi there"}),
        )
        .unwrap();
        assert_eq!(payload.text, "https://wa.me/1555?text=hi%20there");
    }

    #[test]
    fn event_block_structure() {
        let payload = parse(
            PayloadKind::Event,
            json!({"title": "Standup", "start": "20260301T090000Z"}),
        )
        .unwrap();
        assert_eq!(
            payload.text,
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20260301T090000Z\nEND:VEVENT\nEND:VCALENDAR"
        );
    }

    #[test]
    fn event_optional_lines() {
        let payload = parse(
            PayloadKind::Event,
            json!({
                "title": "Demo",
                "start": "20260301T090000Z",
                "end": "20260301T100000Z",
                "location": "Room 4",
            }),
        )
        .unwrap();
        assert!(payload.text.contains("DTEND:20260301T100000Z"));
        assert!(payload.text.contains("LOCATION:Room 4"));
        assert!(!payload.text.contains("DESCRIPTION:"));
    }

    #[test]
    fn event_requires_title_and_start() {
        assert!(parse(PayloadKind::Event, json!({"title": "X"})).is_err());
        assert!(parse(PayloadKind::Event, json!({"start": "20260301"})).is_err());
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(PayloadKind::parse("WiFi").unwrap(), PayloadKind::Wifi);
        assert!(PayloadKind::parse("bogus").is_err());
    }

    #[test]
    fn invalid_type_message_lists_valid_set() {
        let err = PayloadKind::parse("bogus").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bogus"));
        assert!(message.contains("wifi"));
        assert!(message.contains("vcard"));
    }

    #[test]
    fn numeric_json_values_read_as_strings() {
        let payload = parse(PayloadKind::Location, json!({"lat": 28.6139, "lng": 77.209})).unwrap();
        assert_eq!(payload.text, "geo:28.6139,77.209");
    }
}
