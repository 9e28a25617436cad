use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, models::Dictionary, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct DictionaryQuery {
    group: Option<String>,
}

/// Handler for the dictionary listing endpoint
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DictionaryQuery>,
) -> AppResult<Json<Vec<Dictionary>>> {
    let dictionaries = state.dictionaries.list(params.group.as_deref()).await?;
    Ok(Json(dictionaries))
}
