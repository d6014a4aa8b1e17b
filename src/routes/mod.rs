//! HTTP route definitions.

pub mod bulk;
pub mod decode;
pub mod generate;

use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use serde_json::{json, Value};

use crate::core::registry::TYPE_REGISTRY;

pub use bulk::ApiBulk;
pub use decode::ApiDecode;
pub use generate::ApiGenerate;

/// Query parameters shared by every generation route.
const SHARED_OPTIONS: [&str; 6] = [
    "size",
    "margin",
    "color",
    "bg_color",
    "error_correction",
    "format",
];

pub struct ApiMeta;

#[OpenApi]
impl ApiMeta {
    /// API index
    ///
    /// Enumerates every route and its parameters.
    #[oai(path = "/", method = "get")]
    async fn index(&self) -> Json<Value> {
        let mut routes = serde_json::Map::new();
        for (name, info) in TYPE_REGISTRY.iter() {
            routes.insert(
                format!("GET /qr/{name}"),
                json!({
                    "required": info.required,
                    "optional": info.optional,
                    "shared": SHARED_OPTIONS,
                    "example": format!("/qr/{name}?{}", info.example),
                }),
            );
        }
        routes.insert(
            "POST /qr/bulk".to_string(),
            json!({
                "body": {
                    "items": "[{type, data}] (1-50 items)",
                    "shared": SHARED_OPTIONS,
                }
            }),
        );
        routes.insert(
            "POST /decode/upload".to_string(),
            json!({"body": "multipart field `image` (image/*, max 5MB)"}),
        );
        routes.insert(
            "POST /decode/base64".to_string(),
            json!({"body": {"image": "base64 string or data URL"}}),
        );
        routes.insert("GET /health".to_string(), json!({}));

        Json(json!({
            "name": "qr-engine",
            "docs": "/docs",
            "routes": routes,
        }))
    }

    /// Health check
    #[oai(path = "/health", method = "get")]
    async fn health(&self) -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "types": TYPE_REGISTRY.keys().collect::<Vec<_>>(),
        }))
    }
}
