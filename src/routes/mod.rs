use std::sync::Arc;

use axum::{
    http::{Method, StatusCode},
    middleware::from_fn,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    db::Cache,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        ArtworkStore, DictionaryService, RecommendOptions, RecommenderSettings,
        SimilarityRecommender,
    },
};

pub mod dictionaries;
pub mod recommendations;

/// Shared handler state
pub struct AppState {
    pub recommender: SimilarityRecommender,
    pub dictionaries: DictionaryService,
    /// Applied to query parameters the caller leaves out
    pub defaults: RecommendOptions,
}

impl AppState {
    /// State with default settings and no cache
    pub fn new(store: Arc<dyn ArtworkStore>) -> Self {
        Self {
            recommender: SimilarityRecommender::new(store.clone(), RecommenderSettings::default()),
            dictionaries: DictionaryService::new(store, None, 0),
            defaults: RecommendOptions::default(),
        }
    }

    pub fn from_config(store: Arc<dyn ArtworkStore>, cache: Option<Cache>, config: &Config) -> Self {
        let settings = RecommenderSettings {
            year_window: config.year_window,
            thumbnail_marker: config.thumbnail_marker.clone(),
        };

        Self {
            recommender: SimilarityRecommender::new(store.clone(), settings),
            dictionaries: DictionaryService::new(store, cache, config.dictionary_cache_ttl),
            defaults: RecommendOptions {
                limit: config.recommendation_limit,
                include_time_range: true,
                diversity_factor: config.diversity_factor,
            },
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/artists/:artist_id/recommendations",
            get(recommendations::recommend),
        )
        .route("/dictionaries", get(dictionaries::list))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
