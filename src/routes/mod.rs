use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    db::FavoriteStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{FavoriteService, PopularityService, RecommendationService, TrendService},
};

pub mod favorites;
pub mod global;

/// Shared application state
///
/// Every service is built over the same store handle; there is no other
/// mutable state shared between requests.
pub struct AppState {
    pub favorites: FavoriteService,
    pub popularity: PopularityService,
    pub trend: TrendService,
    pub recommendations: RecommendationService,
}

impl AppState {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self {
            favorites: FavoriteService::new(store.clone()),
            popularity: PopularityService::new(store.clone()),
            trend: TrendService::new(store.clone()),
            recommendations: RecommendationService::new(store),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/favorites", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Favorite routes under /api/favorites
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(favorites::add))
        .route(
            "/mine",
            get(favorites::list_mine).delete(favorites::remove_mine),
        )
        .route("/mine/:cocktail_id", get(favorites::is_favorite))
        .route("/:cocktail_id", delete(favorites::remove))
        .route(
            "/recommended",
            get(favorites::recommended).delete(favorites::remove_recommended),
        )
        .route("/global/popular", get(global::popular))
        .route("/global/trend/:cocktail_id", get(global::trend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
