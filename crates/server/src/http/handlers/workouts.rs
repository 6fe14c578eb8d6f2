use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::http::types::{ApiError, AppState};
use crate::store::{
    LikeRow, NewWorkoutExercise, WorkoutDetail, WorkoutExerciseRow, WorkoutFields, WorkoutRow,
};

pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkoutRow>>, ApiError> {
    Ok(Json(state.store.workouts().await?))
}

pub async fn detail_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    state
        .store
        .workout(id)
        .await?
        .map(Json)
        .ok_or(ApiError::WorkoutNotFound)
}

pub async fn category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<WorkoutRow>>, ApiError> {
    Ok(Json(state.store.workouts_by_category(&category).await?))
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(fields): Json<WorkoutFields>,
) -> Result<(StatusCode, Json<WorkoutRow>), ApiError> {
    let workout = state.store.create_workout(fields).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn create_exercise_handler(
    State(state): State<AppState>,
    Json(row): Json<NewWorkoutExercise>,
) -> Result<(StatusCode, Json<WorkoutExerciseRow>), ApiError> {
    let row = state.store.create_workout_exercise(row).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<WorkoutFields>,
) -> Result<Json<WorkoutRow>, ApiError> {
    state
        .store
        .update_workout(id, fields)
        .await?
        .map(Json)
        .ok_or(ApiError::WorkoutNotFound)
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_workout(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_exercises_handler(
    State(state): State<AppState>,
    Path(workout_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_workout_exercises(workout_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Increments the like counter and returns the new count.
pub async fn like_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeRow>, ApiError> {
    state
        .store
        .like_workout(id)
        .await?
        .map(Json)
        .ok_or(ApiError::WorkoutNotFound)
}
