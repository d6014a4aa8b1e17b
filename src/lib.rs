use std::sync::Arc;

use poem::http::{header, StatusCode};
use poem::{Endpoint, EndpointExt, Middleware, Request, Route};
use poem_openapi::OpenApiService;

use crate::core::encoder::QrEncoder;
use crate::routes::{ApiBulk, ApiDecode, ApiGenerate, ApiMeta};
use crate::settings::Config;

pub mod core;
pub mod routes;
pub mod schemas;
pub mod settings;

/// Request bodies are capped at 10 MB.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub engine: Arc<QrEncoder>,
}

/// Rejects requests whose declared body size exceeds a cap. Requests
/// without a Content-Length header (plain GETs) pass through.
struct BodyLimit {
    max_bytes: usize,
}

impl<E: Endpoint> Middleware<E> for BodyLimit {
    type Output = BodyLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        BodyLimitEndpoint {
            inner: ep,
            max_bytes: self.max_bytes,
        }
    }
}

struct BodyLimitEndpoint<E> {
    inner: E,
    max_bytes: usize,
}

impl<E: Endpoint> Endpoint for BodyLimitEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let declared = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(len) = declared {
            if len > self.max_bytes {
                return Err(poem::Error::from_string(
                    format!("request body exceeds the {} byte limit", self.max_bytes),
                    StatusCode::PAYLOAD_TOO_LARGE,
                ));
            }
        }
        self.inner.call(req).await
    }
}

pub fn init_openapi_route(app_state: Arc<AppState>, config: &Config) -> impl Endpoint + use<> {
    let prefix = config.prefix.clone().unwrap_or("/".to_string());
    let openapi_route = OpenApiService::new(
        (ApiMeta, ApiGenerate, ApiBulk, ApiDecode),
        "QR Engine API",
        "1.0",
    )
    .server(prefix.clone());

    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("/openapi.json", openapi_json_endpoint)
        .with(BodyLimit {
            max_bytes: MAX_BODY_BYTES,
        })
        .with(poem::middleware::AddData::new(app_state))
        .with(poem::middleware::Cors::new())
}
