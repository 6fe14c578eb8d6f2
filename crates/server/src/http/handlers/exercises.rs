use axum::Json;
use axum::extract::{Path, State};

use crate::http::types::{ApiError, AppState};
use crate::store::CatalogRow;

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogRow>>, ApiError> {
    Ok(Json(state.store.exercises().await?))
}

pub async fn category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CatalogRow>>, ApiError> {
    Ok(Json(state.store.exercises_by_category(&category).await?))
}
