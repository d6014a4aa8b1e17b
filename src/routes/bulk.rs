//! Bulk generation route.

use poem::http::StatusCode;
use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};
use std::sync::Arc;

use crate::core::batch::{run_batch, BatchItem};
use crate::core::options::RawOptions;
use crate::schemas::{BulkEnvelope, BulkRequest, ErrorBody};
use crate::AppState;

#[derive(ApiResponse)]
pub enum BulkResponse {
    /// Aggregate report, one entry per input item
    #[oai(status = 200)]
    Ok(Json<BulkEnvelope>),

    /// Batch-level validation failure (empty or oversized)
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// Unexpected failure
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

pub struct ApiBulk;

#[OpenApi]
impl ApiBulk {
    /// Bulk generation
    ///
    /// Generates up to 50 QR codes in one request. Items share one set of
    /// rendering options; each item succeeds or fails independently and the
    /// result list always matches the input list in length and order.
    #[oai(path = "/qr/bulk", method = "post")]
    async fn bulk(
        &self,
        state: Data<&Arc<AppState>>,
        body: Json<BulkRequest>,
    ) -> BulkResponse {
        let items: Vec<BatchItem> = body
            .items
            .iter()
            .map(|item| BatchItem {
                kind: item.kind.clone(),
                data: item.data.clone(),
            })
            .collect();
        let options = RawOptions {
            size: body.size.clone(),
            margin: body.margin.clone(),
            color: body.color.clone(),
            bg_color: body.bg_color.clone(),
            error_correction: body.error_correction.clone(),
            format: body.format.clone(),
        };

        match run_batch(&state.engine, &items, &options).await {
            Ok(outcome) => {
                tracing::info!(
                    "bulk batch done: {} ok, {} failed",
                    outcome.success_count,
                    outcome.failed_count
                );
                BulkResponse::Ok(Json(BulkEnvelope::from(&outcome)))
            }
            Err(err) => match err.status() {
                StatusCode::INTERNAL_SERVER_ERROR => {
                    tracing::error!("bulk batch failed: {err}");
                    BulkResponse::Internal(Json(ErrorBody::new(err.to_string())))
                }
                _ => {
                    tracing::warn!("bulk batch rejected: {err}");
                    BulkResponse::BadRequest(Json(ErrorBody::new(err.to_string())))
                }
            },
        }
    }
}
