use poem::{http::StatusCode, test::TestClient, Endpoint};
use qr_engine::core::encoder::QrEncoder;
use qr_engine::settings::Config;
use qr_engine::{init_openapi_route, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

fn test_client() -> TestClient<impl Endpoint> {
    let app_state = Arc::new(AppState {
        engine: Arc::new(QrEncoder::new()),
    });
    let config = Config {
        env: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        prefix: None,
    };
    TestClient::new(init_openapi_route(app_state, &config))
}

async fn body_json(resp: poem::test::TestResponse) -> Value {
    let body = resp.0.into_body().into_string().await.unwrap();
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn health_lists_supported_types() {
    let cli = test_client();

    let resp = cli.get("/health").send().await;
    resp.assert_status_is_ok();

    let health = body_json(resp).await;
    assert_eq!(health["status"].as_str().unwrap(), "healthy");
    let types: Vec<&str> = health["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(types.len(), 11);
    assert!(types.contains(&"wifi"));
    assert!(types.contains(&"vcard"));
}

#[tokio::test]
async fn index_enumerates_routes() {
    let cli = test_client();

    let resp = cli.get("/").send().await;
    resp.assert_status_is_ok();

    let index = body_json(resp).await;
    let routes = index["routes"].as_object().unwrap();
    assert!(routes.contains_key("GET /qr/url"));
    assert!(routes.contains_key("POST /qr/bulk"));
    assert!(routes.contains_key("POST /decode/base64"));
    assert_eq!(
        routes["GET /qr/location"]["required"],
        json!(["lat", "lng"])
    );
}

#[tokio::test]
async fn url_generation_returns_png_by_default() {
    let cli = test_client();

    let resp = cli.get("/qr/url?url=https://example.com").send().await;
    resp.assert_status_is_ok();
    resp.assert_header("content-type", "image/png");

    let bytes = resp.0.into_body().into_vec().await.unwrap();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn base64_format_returns_envelope_with_echoes() {
    let cli = test_client();

    let resp = cli
        .get("/qr/url?url=https://example.com&format=base64&size=500")
        .send()
        .await;
    resp.assert_status_is_ok();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["type"], json!("url"));
    assert_eq!(envelope["input"]["url"], json!("https://example.com"));
    assert_eq!(envelope["qr_options"]["width"], json!(500));
    assert_eq!(envelope["qr_options"]["format"], json!("base64"));
    assert!(envelope["data"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn svg_format_returns_markup() {
    let cli = test_client();

    let resp = cli
        .get("/qr/wifi?ssid=MyNetwork&password=secret&format=svg")
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_header("content-type", "image/svg+xml");

    let body = resp.0.into_body().into_string().await.unwrap();
    assert!(body.contains("<svg"));
    assert!(body.contains("h1v1h-1z"));
}

#[tokio::test]
async fn missing_required_field_is_a_400_with_example() {
    let cli = test_client();

    let resp = cli.get("/qr/url").send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("url"), "got: {error}");
    assert!(error.contains("e.g."), "got: {error}");
}

#[tokio::test]
async fn non_http_scheme_is_rejected() {
    let cli = test_client();

    let resp = cli.get("/qr/url?url=ftp://x").send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("scheme"));
}

#[tokio::test]
async fn out_of_range_latitude_is_rejected() {
    let cli = test_client();

    let resp = cli.get("/qr/location?lat=91&lng=0").send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("lat"));
}

#[tokio::test]
async fn vcard_forces_error_correction_h() {
    let cli = test_client();

    let resp = cli
        .get("/qr/vcard?name=Jane%20Doe&error_correction=L&format=base64")
        .send()
        .await;
    resp.assert_status_is_ok();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["qr_options"]["error_correction"], json!("H"));
}

#[tokio::test]
async fn bulk_isolates_per_item_failures() {
    let cli = test_client();

    let payload = json!({
        "items": [
            {"type": "url", "data": {"url": "https://x.com"}},
            {"type": "bogus", "data": {}},
        ],
        "format": "base64",
    });

    let resp = cli
        .post("/qr/bulk")
        .content_type("application/json")
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status_is_ok();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["count"], json!(2));
    assert_eq!(envelope["success_count"], json!(1));
    assert_eq!(envelope["failed_count"], json!(1));

    let results = envelope["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["index"], json!(0));
    assert_eq!(results[0]["success"], json!(true));
    assert!(results[0]["qr"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(results[1]["success"], json!(false));
    assert!(results[1]["error"]
        .as_str()
        .unwrap()
        .contains("unknown payload type"));
}

#[tokio::test]
async fn empty_bulk_batch_is_rejected_wholesale() {
    let cli = test_client();

    let resp = cli
        .post("/qr/bulk")
        .content_type("application/json")
        .body_json(&json!({"items": []}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn oversized_bulk_batch_is_rejected_wholesale() {
    let cli = test_client();

    let items: Vec<Value> = (0..51)
        .map(|_| json!({"type": "text", "data": {"text": "x"}}))
        .collect();
    let resp = cli
        .post("/qr/bulk")
        .content_type("application/json")
        .body_json(&json!({"items": items}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generated_code_round_trips_through_decode() {
    let cli = test_client();

    let resp = cli
        .get("/qr/text?text=round-trip-check&format=base64&size=400&margin=4")
        .send()
        .await;
    resp.assert_status_is_ok();
    let envelope = body_json(resp).await;
    let data_url = envelope["data"].as_str().unwrap().to_string();

    let resp = cli
        .post("/decode/base64")
        .content_type("application/json")
        .body_json(&json!({"image": data_url}))
        .send()
        .await;
    resp.assert_status_is_ok();

    let decoded = body_json(resp).await;
    assert_eq!(decoded["success"], json!(true));
    assert_eq!(decoded["data"]["text"], json!("round-trip-check"));
    assert!(decoded["data"]["corners"]["topLeft"]["x"].is_number());
    assert!(decoded["data"]["corners"]["bottomRight"]["y"].is_number());
}

#[tokio::test]
async fn blank_image_decode_is_422() {
    use base64::Engine as _;

    let img = image::RgbImage::from_pixel(200, 200, image::Rgb([255, 255, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);

    let cli = test_client();
    let resp = cli
        .post("/decode/base64")
        .content_type("application/json")
        .body_json(&json!({"image": encoded}))
        .send()
        .await;
    resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("no QR code"));
}

#[tokio::test]
async fn invalid_base64_decode_is_400() {
    let cli = test_client();

    let resp = cli
        .post("/decode/base64")
        .content_type("application/json")
        .body_json(&json!({"image": "!!not base64!!"}))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let cli = test_client();

    let resp = cli.get("/nope").send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
}
