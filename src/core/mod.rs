//! The payload construction, validation, and rendering engine.

pub mod batch;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod options;
pub mod payload;
pub mod registry;

use crate::core::encoder::{QrEncoder, Rendered};
use crate::core::error::QrError;
use crate::core::options::{normalize, QrOptions, RawOptions};
use crate::core::payload::{Fields, Payload, PayloadKind, PayloadRequest};

/// A generated QR code together with the canonical inputs that produced it.
#[derive(Debug, Clone)]
pub struct Generated {
    pub payload: Payload,
    pub options: QrOptions,
    pub image: Rendered,
}

/// Single-item pipeline: parse and validate the field bag, normalize the
/// options, apply per-kind overrides, and invoke the encoder.
pub async fn generate(
    encoder: &QrEncoder,
    kind: PayloadKind,
    fields: &Fields,
    raw_options: &RawOptions,
) -> Result<Generated, QrError> {
    let payload = PayloadRequest::parse(kind, fields)?.to_payload();

    let mut options = normalize(raw_options);
    if let Some(level) = kind.forced_ec_level() {
        options.ec_level = level;
    }

    tracing::info!(
        "generating {} QR ({} bytes payload, {}px, {:?})",
        payload.kind.as_str(),
        payload.text.len(),
        options.width_px,
        options.format,
    );

    let image = encoder.render(&payload.text, &options).await?;
    Ok(Generated {
        payload,
        options,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::EcLevel;
    use serde_json::json;

    #[tokio::test]
    async fn vcard_overrides_requested_error_correction() {
        let fields = Fields::from_value(&json!({"name": "Jane Doe"}));
        let raw = RawOptions {
            error_correction: Some("L".into()),
            ..RawOptions::default()
        };
        let generated = generate(&QrEncoder::new(), PayloadKind::Vcard, &fields, &raw)
            .await
            .unwrap();
        assert_eq!(generated.options.ec_level, EcLevel::H);
    }

    #[tokio::test]
    async fn other_kinds_keep_requested_level() {
        let fields = Fields::from_value(&json!({"text": "hi"}));
        let raw = RawOptions {
            error_correction: Some("L".into()),
            ..RawOptions::default()
        };
        let generated = generate(&QrEncoder::new(), PayloadKind::Text, &fields, &raw)
            .await
            .unwrap();
        assert_eq!(generated.options.ec_level, EcLevel::L);
    }

    #[tokio::test]
    async fn validation_errors_surface_before_encoding() {
        let fields = Fields::from_value(&json!({}));
        let err = generate(
            &QrEncoder::new(),
            PayloadKind::Url,
            &fields,
            &RawOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QrError::Validation { .. }));
    }
}
