use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{exercises, health, workouts};
use super::types::AppState;
use crate::store::WorkoutStore;

pub fn router(store: Arc<dyn WorkoutStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/workouts",
            get(workouts::list_handler).post(workouts::create_handler),
        )
        .route(
            "/api/workouts/:id",
            get(workouts::detail_handler)
                .put(workouts::update_handler)
                .delete(workouts::delete_handler),
        )
        .route(
            "/api/workouts/category/:category",
            get(workouts::category_handler),
        )
        .route("/api/workouts/:id/like", post(workouts::like_handler))
        .route(
            "/api/workout-exercises",
            post(workouts::create_exercise_handler),
        )
        .route(
            "/api/workout-exercises/:workout_id",
            delete(workouts::delete_exercises_handler),
        )
        .route("/api/exercises", get(exercises::list_handler))
        .route(
            "/api/exercises/category/:category",
            get(exercises::category_handler),
        )
        .with_state(AppState { store })
        .layer(cors)
}
