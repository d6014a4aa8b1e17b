//! QR decoding pipeline.
//!
//! Accepts raw image bytes from either transport (multipart upload or a
//! base64/data-URL body), hands pixel decoding to `rqrr`, and reports the
//! decoded text together with the detected symbol's corner geometry.
//! "Readable image, no symbol" is a distinct outcome from "unreadable
//! bytes".

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::core::error::QrError;

/// Uploaded images are capped at 5 MB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedQr {
    pub text: String,
    pub corners: Corners,
}

/// Decode the first QR symbol found in the image.
pub async fn decode(bytes: Vec<u8>) -> Result<DecodedQr, QrError> {
    tokio::task::spawn_blocking(move || decode_sync(&bytes))
        .await
        .map_err(|e| QrError::Processing(format!("task join error: {e}")))?
}

fn decode_sync(bytes: &[u8]) -> Result<DecodedQr, QrError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| QrError::Processing(format!("could not read image: {e}")))?;
    let luma = img.to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );

    // First grid that decodes wins; a grid that fails bit-level decoding is
    // treated the same as no grid at all.
    for grid in prepared.detect_grids() {
        let Ok((_meta, content)) = grid.decode() else {
            continue;
        };
        let bounds = &grid.bounds;
        return Ok(DecodedQr {
            text: content,
            corners: Corners {
                top_left: point(&bounds[0]),
                top_right: point(&bounds[1]),
                bottom_right: point(&bounds[2]),
                bottom_left: point(&bounds[3]),
            },
        });
    }

    Err(QrError::DecodeNotFound)
}

fn point(p: &rqrr::Point) -> Point {
    Point {
        x: p.x as f64,
        y: p.y as f64,
    }
}

/// Unwrap a base64 body (optionally a `data:...;base64,` URL) into image
/// bytes, enforcing the upload size cap.
pub fn decode_base64_image(input: &str) -> Result<Vec<u8>, QrError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QrError::missing("image", "data:image/png;base64,..."));
    }

    let encoded = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            rest.split_once(',')
                .map(|(_, data)| data)
                .ok_or_else(|| QrError::validation("image", "malformed data URL"))?
        }
        None => trimmed,
    };

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| QrError::validation("image", "must be base64 or a base64 data URL"))?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(QrError::validation(
            "image",
            format!("image exceeds the {} byte limit", MAX_IMAGE_BYTES),
        ));
    }
    Ok(bytes)
}
