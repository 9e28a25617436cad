use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{ContentId, ScoredCandidate},
    routes::AppState,
    services::RecommendOptions,
};

/// Largest `limit` a caller may request
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    limit: Option<usize>,
    include_time_range: Option<bool>,
    diversity_factor: Option<f64>,
}

impl RecommendationQuery {
    fn into_options(self, defaults: RecommendOptions) -> AppResult<RecommendOptions> {
        let options = RecommendOptions {
            limit: self.limit.unwrap_or(defaults.limit),
            include_time_range: self.include_time_range.unwrap_or(defaults.include_time_range),
            diversity_factor: self.diversity_factor.unwrap_or(defaults.diversity_factor),
        };

        if options.limit > MAX_RECOMMENDATION_LIMIT {
            return Err(AppError::InvalidInput(format!(
                "limit must be at most {}",
                MAX_RECOMMENDATION_LIMIT
            )));
        }
        options.validate()?;

        Ok(options)
    }
}

/// Handler for the artist recommendations endpoint
///
/// Storage failures produce an empty list rather than an error response.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(artist_id): Path<ContentId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<ScoredCandidate>>> {
    let options = params.into_options(state.defaults)?;

    tracing::info!(
        request_id = %request_id,
        artist_id,
        limit = options.limit,
        include_time_range = options.include_time_range,
        diversity_factor = options.diversity_factor,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(artist_id, options).await;

    Ok(Json(recommendations))
}
