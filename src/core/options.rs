//! Rendering option normalization.
//!
//! Callers send loosely-typed strings; everything is coerced into a
//! canonical [`QrOptions`] before it reaches the encoder. Out-of-range or
//! unparseable input falls back to a default and is clamped, never rejected.

use serde::{Deserialize, Serialize};

pub const MIN_WIDTH_PX: u32 = 100;
pub const MAX_WIDTH_PX: u32 = 2000;
pub const DEFAULT_WIDTH_PX: u32 = 300;

pub const MAX_MARGIN_MODULES: u32 = 10;
pub const DEFAULT_MARGIN_MODULES: u32 = 2;

pub const DEFAULT_DARK_COLOR: &str = "000000";
pub const DEFAULT_LIGHT_COLOR: &str = "ffffff";

/// Rendering options as received, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOptions {
    pub size: Option<String>,
    pub margin: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub error_correction: Option<String>,
    pub format: Option<String>,
}

/// Error correction level, lowest to highest redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("l") => EcLevel::L,
            Some(s) if s.eq_ignore_ascii_case("m") => EcLevel::M,
            Some(s) if s.eq_ignore_ascii_case("q") => EcLevel::Q,
            Some(s) if s.eq_ignore_ascii_case("h") => EcLevel::H,
            _ => EcLevel::M,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Svg,
    Base64,
}

impl OutputFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            Some(s) if s.eq_ignore_ascii_case("base64") => OutputFormat::Base64,
            _ => OutputFormat::Png,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Base64 => "base64",
        }
    }
}

/// Canonical rendering options. All fields are in range once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrOptions {
    pub width_px: u32,
    pub margin_modules: u32,
    /// Hex color without leading `#`. Not validated here; a malformed value
    /// surfaces as an encoder failure.
    pub dark_color: String,
    pub light_color: String,
    pub ec_level: EcLevel,
    pub format: OutputFormat,
}

/// Normalize raw options into canonical ones. Total function.
pub fn normalize(raw: &RawOptions) -> QrOptions {
    QrOptions {
        width_px: parse_clamped(raw.size.as_deref(), DEFAULT_WIDTH_PX, MIN_WIDTH_PX, MAX_WIDTH_PX),
        margin_modules: parse_clamped(
            raw.margin.as_deref(),
            DEFAULT_MARGIN_MODULES,
            0,
            MAX_MARGIN_MODULES,
        ),
        dark_color: strip_hash(raw.color.as_deref(), DEFAULT_DARK_COLOR),
        light_color: strip_hash(raw.bg_color.as_deref(), DEFAULT_LIGHT_COLOR),
        ec_level: EcLevel::parse(raw.error_correction.as_deref()),
        format: OutputFormat::parse(raw.format.as_deref()),
    }
}

fn parse_clamped(raw: Option<&str>, default: u32, min: u32, max: u32) -> u32 {
    let value = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(i64::from(default));
    value.clamp(i64::from(min), i64::from(max)) as u32
}

fn strip_hash(raw: Option<&str>, default: &str) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.strip_prefix('#').unwrap_or(s).to_string(),
        _ => default.to_string(),
    }
}
