//! Request and response schemas for the HTTP surface.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::batch::{BatchOutcome, ItemOutcome};
use crate::core::decoder::DecodedQr;
use crate::core::options::QrOptions;

/// Error body shared by every failure response.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            success: false,
            error: error.into(),
        }
    }
}

/// Normalized rendering options, echoed back to the caller.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct OptionsEcho {
    pub width: u32,
    pub margin: u32,
    pub color: String,
    pub bg_color: String,
    pub error_correction: String,
    pub format: String,
}

impl From<&QrOptions> for OptionsEcho {
    fn from(options: &QrOptions) -> Self {
        OptionsEcho {
            width: options.width_px,
            margin: options.margin_modules,
            color: options.dark_color.clone(),
            bg_color: options.light_color.clone(),
            error_correction: options.ec_level.as_str().to_string(),
            format: options.format.as_str().to_string(),
        }
    }
}

/// Envelope returned for `format=base64` generation requests.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct GenerateEnvelope {
    pub success: bool,
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    /// Echo of the request's payload fields.
    pub input: Value,
    pub qr_options: OptionsEcho,
    /// Base64 data URL of the rendered image.
    pub data: String,
}

/// One bulk input item.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct BulkItem {
    /// Payload type name (see `/health` for the valid set).
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload fields for the type.
    pub data: Value,
}

/// Bulk generation request: up to 50 items sharing one option set.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct BulkRequest {
    pub items: Vec<BulkItem>,
    pub size: Option<String>,
    pub margin: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub error_correction: Option<String>,
    pub format: Option<String>,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct BulkItemResult {
    pub index: u32,
    pub success: bool,
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Inline image (data URL or SVG markup) when the item succeeded.
    pub qr: Option<String>,
    pub error: Option<String>,
}

impl From<&ItemOutcome> for BulkItemResult {
    fn from(outcome: &ItemOutcome) -> Self {
        BulkItemResult {
            index: outcome.index as u32,
            success: outcome.success,
            kind: outcome.kind.map(|k| k.as_str().to_string()),
            qr: outcome.image.clone(),
            error: outcome.error.clone(),
        }
    }
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct BulkEnvelope {
    pub success: bool,
    pub count: u32,
    pub success_count: u32,
    pub failed_count: u32,
    pub results: Vec<BulkItemResult>,
}

impl From<&BatchOutcome> for BulkEnvelope {
    fn from(outcome: &BatchOutcome) -> Self {
        BulkEnvelope {
            success: true,
            count: outcome.results.len() as u32,
            success_count: outcome.success_count as u32,
            failed_count: outcome.failed_count as u32,
            results: outcome.results.iter().map(BulkItemResult::from).collect(),
        }
    }
}

/// Decode request carrying a base64 or data-URL image.
#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct DecodeBase64Request {
    pub image: String,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct PointSchema {
    pub x: f64,
    pub y: f64,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct CornersSchema {
    #[oai(rename = "topLeft")]
    #[serde(rename = "topLeft")]
    pub top_left: PointSchema,
    #[oai(rename = "topRight")]
    #[serde(rename = "topRight")]
    pub top_right: PointSchema,
    #[oai(rename = "bottomRight")]
    #[serde(rename = "bottomRight")]
    pub bottom_right: PointSchema,
    #[oai(rename = "bottomLeft")]
    #[serde(rename = "bottomLeft")]
    pub bottom_left: PointSchema,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct DecodedData {
    pub text: String,
    pub corners: CornersSchema,
}

#[derive(Object, Serialize, Deserialize, Debug, Clone)]
pub struct DecodeEnvelope {
    pub success: bool,
    pub data: DecodedData,
}

impl From<&DecodedQr> for DecodeEnvelope {
    fn from(decoded: &DecodedQr) -> Self {
        let point = |p: &crate::core::decoder::Point| PointSchema { x: p.x, y: p.y };
        DecodeEnvelope {
            success: true,
            data: DecodedData {
                text: decoded.text.clone(),
                corners: CornersSchema {
                    top_left: point(&decoded.corners.top_left),
                    top_right: point(&decoded.corners.top_right),
                    bottom_right: point(&decoded.corners.bottom_right),
                    bottom_left: point(&decoded.corners.bottom_left),
                },
            },
        }
    }
}
