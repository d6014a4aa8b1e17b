//! Decode routes: multipart upload and base64 body.

use poem::http::StatusCode;
use poem_openapi::payload::Json;
use poem_openapi::types::multipart::Upload;
use poem_openapi::{ApiResponse, Multipart, OpenApi};

use crate::core::decoder::{self, MAX_IMAGE_BYTES};
use crate::core::error::QrError;
use crate::schemas::{DecodeBase64Request, DecodeEnvelope, ErrorBody};

#[derive(ApiResponse)]
pub enum DecodeResponse {
    /// Decoded text plus corner geometry
    #[oai(status = 200)]
    Ok(Json<DecodeEnvelope>),

    /// Malformed request (bad upload, bad base64, oversized image)
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// The image was readable but contains no QR symbol
    #[oai(status = 422)]
    NotFound(Json<ErrorBody>),

    /// Unreadable image bytes or internal failure
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

fn failure(err: QrError) -> DecodeResponse {
    let body = Json(ErrorBody::new(err.to_string()));
    match err.status() {
        StatusCode::UNPROCESSABLE_ENTITY => DecodeResponse::NotFound(body),
        StatusCode::BAD_REQUEST => DecodeResponse::BadRequest(body),
        _ => {
            tracing::error!("decode failed: {err}");
            DecodeResponse::Internal(body)
        }
    }
}

async fn run(bytes: Vec<u8>) -> DecodeResponse {
    match decoder::decode(bytes).await {
        Ok(decoded) => {
            tracing::info!("decoded QR ({} chars)", decoded.text.len());
            DecodeResponse::Ok(Json(DecodeEnvelope::from(&decoded)))
        }
        Err(err) => failure(err),
    }
}

/// Multipart body carrying the image to scan.
#[derive(Debug, Multipart)]
pub struct DecodeUpload {
    /// Image file containing a QR code
    image: Upload,
}

pub struct ApiDecode;

#[OpenApi]
impl ApiDecode {
    /// Decode an uploaded image
    ///
    /// Accepts an image attachment (image/* content types, up to 5 MB) and
    /// returns the decoded text with the symbol's corner coordinates.
    #[oai(path = "/decode/upload", method = "post")]
    async fn decode_upload(&self, upload: DecodeUpload) -> DecodeResponse {
        let content_type = upload.image.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return DecodeResponse::BadRequest(Json(ErrorBody::new(
                "only image uploads are accepted (content type must be image/*)",
            )));
        }

        let bytes = match upload.image.into_vec().await {
            Ok(bytes) => bytes,
            Err(e) => return failure(QrError::Processing(format!("failed to read upload: {e}"))),
        };
        if bytes.len() > MAX_IMAGE_BYTES {
            return DecodeResponse::BadRequest(Json(ErrorBody::new(format!(
                "image exceeds the {MAX_IMAGE_BYTES} byte limit"
            ))));
        }

        run(bytes).await
    }

    /// Decode a base64 image
    ///
    /// Accepts `{ "image": "<base64 or data URL>" }`.
    #[oai(path = "/decode/base64", method = "post")]
    async fn decode_base64(&self, body: Json<DecodeBase64Request>) -> DecodeResponse {
        match decoder::decode_base64_image(&body.image) {
            Ok(bytes) => run(bytes).await,
            Err(err) => failure(err),
        }
    }
}
