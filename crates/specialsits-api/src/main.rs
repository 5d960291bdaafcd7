use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use specialsits_api::config::ApiConfig;
use specialsits_api::routes::create_router;
use specialsits_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "specialsits_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    tracing::info!(
        port = config.port,
        base_path = %config.base_path.display(),
        "Starting SpecialSits API server"
    );

    if !config.base_path.exists() {
        tracing::warn!(
            base_path = %config.base_path.display(),
            "Data directory does not exist; dataset routes will return 404 until it is populated"
        );
    }

    let state = Arc::new(AppState::new(config.base_path.clone()));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.unwrap();
}
