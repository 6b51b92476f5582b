pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::{any::Any, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    controllers::{health, translate::TranslateController},
    domain::conversion::ConversionService,
    error::AppError,
    infrastructure::config::Config,
};

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with every route and layer
pub fn build_router(
    conversion_service: Arc<ConversionService>,
    translate_controller: Arc<TranslateController>,
    max_upload_bytes: usize,
) -> Router {
    let translate_routes = Router::new()
        .route("/translate", post(TranslateController::translate))
        .with_state(translate_controller)
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(conversion_service)
        .merge(translate_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    conversion_service: Arc<ConversionService>,
    translate_controller: Arc<TranslateController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(
        conversion_service,
        translate_controller,
        config.max_upload_bytes,
    );

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = detail, "Handler panicked");

    AppError::Internal("Internal server error".to_string()).into_response()
}
