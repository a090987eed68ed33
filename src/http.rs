use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::queue::SqsQueueClient;
use crate::service::ProductService;

mod handlers;

/// Shared state behind every HTTP handler.
///
/// The SNS and queue clients are optional: when AWS is not configured the
/// service still serves the catalog, and the notify/events endpoints report
/// an unconfigured client instead.
pub struct AppState {
    pub db: PgPool,
    pub service: Arc<ProductService>,
    pub sns: Option<aws_sdk_sns::Client>,
    pub queue: Option<SqsQueueClient>,
    pub events_queue_url: Option<String>,
}

/// Builds the router with all routes and middleware.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::hello_world))
        .route("/health", get(handlers::health))
        .route("/notify", post(handlers::notify))
        .route("/events", get(handlers::events))
        .route(
            "/products",
            post(handlers::create_product).get(handlers::list_products),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
