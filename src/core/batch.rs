//! Bulk generation.
//!
//! Applies the single-item construction rules across a heterogeneous list
//! with bulkhead isolation: one item's failure becomes a failure record at
//! that index and never touches its siblings. The outcome always has one
//! entry per input item, in input order.

use serde_json::Value;

use crate::core::encoder::QrEncoder;
use crate::core::error::QrError;
use crate::core::options::{normalize, QrOptions, RawOptions};
use crate::core::payload::{Fields, PayloadKind, PayloadRequest};

/// Batches are capped at 50 items.
pub const MAX_BATCH_ITEMS: usize = 50;

/// One bulk input item: a type name plus its loosely-typed field bag.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub index: usize,
    pub success: bool,
    pub kind: Option<PayloadKind>,
    /// Inline image (data URL or SVG markup) on success.
    pub image: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<ItemOutcome>,
    pub success_count: usize,
    pub failed_count: usize,
}

/// Run a batch. Count violations short-circuit the whole batch; everything
/// after that is per-item.
pub async fn run_batch(
    encoder: &QrEncoder,
    items: &[BatchItem],
    raw_options: &RawOptions,
) -> Result<BatchOutcome, QrError> {
    if items.is_empty() {
        return Err(QrError::validation(
            "items",
            "must contain at least one item",
        ));
    }
    if items.len() > MAX_BATCH_ITEMS {
        return Err(QrError::validation(
            "items",
            format!("must contain at most {MAX_BATCH_ITEMS} items"),
        ));
    }

    // Bulk shares one option set; there are no per-item rendering options.
    let options = normalize(raw_options);

    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let outcome = match process_item(encoder, item, &options).await {
            Ok((kind, image)) => ItemOutcome {
                index,
                success: true,
                kind: Some(kind),
                image: Some(image),
                error: None,
            },
            Err(err) => {
                tracing::warn!("bulk item {index} failed: {err}");
                ItemOutcome {
                    index,
                    success: false,
                    kind: None,
                    image: None,
                    error: Some(err.to_string()),
                }
            }
        };
        results.push(outcome);
    }

    let success_count = results.iter().filter(|r| r.success).count();
    Ok(BatchOutcome {
        failed_count: results.len() - success_count,
        success_count,
        results,
    })
}

async fn process_item(
    encoder: &QrEncoder,
    item: &BatchItem,
    shared_options: &QrOptions,
) -> Result<(PayloadKind, String), QrError> {
    let kind = PayloadKind::parse(&item.kind)?;
    let fields = Fields::from_value(&item.data);
    let payload = PayloadRequest::parse(kind, &fields)?.to_payload();

    let mut options = shared_options.clone();
    if let Some(level) = kind.forced_ec_level() {
        options.ec_level = level;
    }

    let rendered = encoder.render(&payload.text, &options).await?;
    Ok((kind, rendered.into_inline_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(kind: &str, data: Value) -> BatchItem {
        BatchItem {
            kind: kind.to_string(),
            data,
        }
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_wholesale() {
        let err = run_batch(&QrEncoder::new(), &[], &RawOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, QrError::Validation { .. }));
    }

    #[tokio::test]
    async fn oversized_batch_is_rejected_wholesale() {
        let items: Vec<BatchItem> = (0..51)
            .map(|_| item("text", json!({"text": "x"})))
            .collect();
        let err = run_batch(&QrEncoder::new(), &items, &RawOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("50"));
    }

    #[tokio::test]
    async fn mixed_batch_isolates_failures_and_keeps_order() {
        let items = vec![
            item("url", json!({"url": "https://x.com"})),
            item("bogus", json!({})),
            item("wifi", json!({"ssid": "net"})),
            item("url", json!({"url": "ftp://nope"})),
        ];
        let outcome = run_batch(&QrEncoder::new(), &items, &RawOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 2);

        assert!(outcome.results[0].success);
        assert_eq!(outcome.results[0].kind, Some(PayloadKind::Url));
        assert!(outcome.results[0]
            .image
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,"));

        assert!(!outcome.results[1].success);
        assert!(outcome.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("unknown payload type"));

        assert!(outcome.results[2].success);
        assert!(!outcome.results[3].success);

        for (i, result) in outcome.results.iter().enumerate() {
            assert_eq!(result.index, i);
        }
    }

    #[tokio::test]
    async fn all_failures_still_yield_full_length() {
        let items = vec![item("bogus", json!({})), item("text", json!({}))];
        let outcome = run_batch(&QrEncoder::new(), &items, &RawOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.success_count, 0);
        assert_eq!(outcome.failed_count, 2);
    }

    #[tokio::test]
    async fn svg_format_embeds_markup() {
        let items = vec![item("text", json!({"text": "hi"}))];
        let raw = RawOptions {
            format: Some("svg".into()),
            ..RawOptions::default()
        };
        let outcome = run_batch(&QrEncoder::new(), &items, &raw).await.unwrap();
        assert!(outcome.results[0]
            .image
            .as_deref()
            .unwrap()
            .starts_with("<?xml"));
    }
}
