//! Generation routes, one per payload type.
//!
//! Every route takes the type-specific fields plus the shared rendering
//! options as query parameters. The response content type follows the
//! requested format: raw PNG, raw SVG, or a JSON envelope for `base64`.

use poem::http::StatusCode;
use poem::web::Data;
use poem_openapi::param::Query;
use poem_openapi::payload::{Attachment, Json, PlainText};
use poem_openapi::{ApiResponse, OpenApi};
use std::sync::Arc;

use crate::core::encoder::Rendered;
use crate::core::error::QrError;
use crate::core::options::RawOptions;
use crate::core::payload::{Fields, PayloadKind};
use crate::schemas::{ErrorBody, GenerateEnvelope, OptionsEcho};
use crate::AppState;

#[derive(ApiResponse)]
pub enum GenerateResponse {
    /// PNG image
    #[oai(status = 200, content_type = "image/png")]
    Png(Attachment<Vec<u8>>),

    /// SVG markup
    #[oai(status = 200, content_type = "image/svg+xml")]
    Svg(PlainText<String>),

    /// JSON envelope carrying a base64 data URL
    #[oai(status = 200)]
    Base64(Json<GenerateEnvelope>),

    /// Missing or malformed field
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// Encoder or other internal failure
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

fn failure(kind: PayloadKind, err: QrError) -> GenerateResponse {
    match err.status() {
        StatusCode::INTERNAL_SERVER_ERROR => {
            tracing::error!("generate {} failed: {err}", kind.as_str());
            GenerateResponse::Internal(Json(ErrorBody::new(err.to_string())))
        }
        _ => {
            tracing::warn!("generate {} rejected: {err}", kind.as_str());
            GenerateResponse::BadRequest(Json(ErrorBody::new(err.to_string())))
        }
    }
}

async fn run(
    state: &AppState,
    kind: PayloadKind,
    fields: Fields,
    raw_options: RawOptions,
) -> GenerateResponse {
    match crate::core::generate(&state.engine, kind, &fields, &raw_options).await {
        Ok(generated) => match generated.image {
            Rendered::Png(bytes) => GenerateResponse::Png(Attachment::new(bytes)),
            Rendered::Svg(svg) => GenerateResponse::Svg(PlainText(svg)),
            Rendered::DataUrl(url) => GenerateResponse::Base64(Json(GenerateEnvelope {
                success: true,
                kind: kind.as_str().to_string(),
                input: fields.to_value(),
                qr_options: OptionsEcho::from(&generated.options),
                data: url,
            })),
        },
        Err(err) => failure(kind, err),
    }
}

fn raw_options(
    size: Option<String>,
    margin: Option<String>,
    color: Option<String>,
    bg_color: Option<String>,
    error_correction: Option<String>,
    format: Option<String>,
) -> RawOptions {
    RawOptions {
        size,
        margin,
        color,
        bg_color,
        error_correction,
        format,
    }
}

pub struct ApiGenerate;

#[OpenApi]
impl ApiGenerate {
    /// URL QR code
    #[oai(path = "/qr/url", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_url(
        &self,
        state: Data<&Arc<AppState>>,
        url: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[("url", &url.0)]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Url, fields, options).await
    }

    /// Plain text QR code
    #[oai(path = "/qr/text", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_text(
        &self,
        state: Data<&Arc<AppState>>,
        text: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[("text", &text.0)]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Text, fields, options).await
    }

    /// Email (mailto) QR code
    #[oai(path = "/qr/email", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_email(
        &self,
        state: Data<&Arc<AppState>>,
        to: Query<Option<String>>,
        subject: Query<Option<String>>,
        body: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("to", &to.0),
            ("subject", &subject.0),
            ("body", &body.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Email, fields, options).await
    }

    /// SMS QR code
    #[oai(path = "/qr/sms", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_sms(
        &self,
        state: Data<&Arc<AppState>>,
        phone: Query<Option<String>>,
        message: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[("phone", &phone.0), ("message", &message.0)]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Sms, fields, options).await
    }

    /// Phone (tel) QR code
    #[oai(path = "/qr/phone", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_phone(
        &self,
        state: Data<&Arc<AppState>>,
        phone: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[("phone", &phone.0)]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Phone, fields, options).await
    }

    /// WiFi network QR code
    #[oai(path = "/qr/wifi", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_wifi(
        &self,
        state: Data<&Arc<AppState>>,
        ssid: Query<Option<String>>,
        password: Query<Option<String>>,
        encryption: Query<Option<String>>,
        hidden: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("ssid", &ssid.0),
            ("password", &password.0),
            ("encryption", &encryption.0),
            ("hidden", &hidden.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Wifi, fields, options).await
    }

    /// vCard contact QR code
    ///
    /// Always rendered at error-correction level H.
    #[oai(path = "/qr/vcard", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_vcard(
        &self,
        state: Data<&Arc<AppState>>,
        name: Query<Option<String>>,
        phone: Query<Option<String>>,
        email: Query<Option<String>>,
        org: Query<Option<String>>,
        title: Query<Option<String>>,
        url: Query<Option<String>>,
        address: Query<Option<String>>,
        note: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("name", &name.0),
            ("phone", &phone.0),
            ("email", &email.0),
            ("org", &org.0),
            ("title", &title.0),
            ("url", &url.0),
            ("address", &address.0),
            ("note", &note.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Vcard, fields, options).await
    }

    /// UPI payment QR code
    #[oai(path = "/qr/upi", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_upi(
        &self,
        state: Data<&Arc<AppState>>,
        vpa: Query<Option<String>>,
        name: Query<Option<String>>,
        amount: Query<Option<String>>,
        currency: Query<Option<String>>,
        note: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("vpa", &vpa.0),
            ("name", &name.0),
            ("amount", &amount.0),
            ("currency", &currency.0),
            ("note", &note.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Upi, fields, options).await
    }

    /// Geolocation QR code
    #[oai(path = "/qr/location", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_location(
        &self,
        state: Data<&Arc<AppState>>,
        lat: Query<Option<String>>,
        lng: Query<Option<String>>,
        label: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("lat", &lat.0),
            ("lng", &lng.0),
            ("label", &label.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Location, fields, options).await
    }

    /// WhatsApp deep-link QR code
    #[oai(path = "/qr/whatsapp", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_whatsapp(
        &self,
        state: Data<&Arc<AppState>>,
        phone: Query<Option<String>>,
        message: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[("phone", &phone.0), ("message", &message.0)]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Whatsapp, fields, options).await
    }

    /// Calendar event QR code
    #[oai(path = "/qr/event", method = "get")]
    #[allow(clippy::too_many_arguments)]
    async fn qr_event(
        &self,
        state: Data<&Arc<AppState>>,
        title: Query<Option<String>>,
        start: Query<Option<String>>,
        end: Query<Option<String>>,
        location: Query<Option<String>>,
        description: Query<Option<String>>,
        size: Query<Option<String>>,
        margin: Query<Option<String>>,
        color: Query<Option<String>>,
        bg_color: Query<Option<String>>,
        error_correction: Query<Option<String>>,
        format: Query<Option<String>>,
    ) -> GenerateResponse {
        let fields = Fields::from_pairs(&[
            ("title", &title.0),
            ("start", &start.0),
            ("end", &end.0),
            ("location", &location.0),
            ("description", &description.0),
        ]);
        let options = raw_options(size.0, margin.0, color.0, bg_color.0, error_correction.0, format.0);
        run(&state, PayloadKind::Event, fields, options).await
    }
}
