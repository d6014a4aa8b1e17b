use std::sync::Arc;

use poem::{listener::TcpListener, Server};

use qr_engine::core::encoder::QrEncoder;
use qr_engine::settings::get_config;
use qr_engine::{init_openapi_route, AppState};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_writer(writer)
        .init();

    tracing::info!("initializing QR engine...");

    let config = get_config();
    let app_state = Arc::new(AppState {
        engine: Arc::new(QrEncoder::new()),
    });
    let app = init_openapi_route(app_state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("QR engine listening on {addr} (docs at /docs)");

    Server::new(TcpListener::bind(addr)).run(app).await
}
