use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::routes::AppState;
use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::errors::WorkoutError;
use crate::models::{CreateWorkoutRequest, UpdateWorkoutRequest, Workout};
use crate::services::WorkoutService;

/// Workout CRUD routes, all behind bearer-token authentication.
pub fn workout_routes(auth_service: AuthService) -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route(
            "/:id",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
}

/// An id that is not a UUID cannot name a stored workout.
fn parse_workout_id(raw: &str) -> Result<Uuid, WorkoutError> {
    Uuid::parse_str(raw).map_err(|_| WorkoutError::NotFound(raw.to_string()))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn list_workouts(
    State(service): State<WorkoutService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<Workout>>, WorkoutError> {
    let workouts = service.find_all(session.user_id).await?;
    Ok(Json(workouts))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_workout(
    State(service): State<WorkoutService>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkoutRequest>, WorkoutError>,
) -> Result<(StatusCode, Json<Workout>), WorkoutError> {
    let workout = service.create(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn get_workout(
    State(service): State<WorkoutService>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, WorkoutError> {
    let id = parse_workout_id(&id)?;
    let workout = service.find_by_id(session.user_id, id).await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn update_workout(
    State(service): State<WorkoutService>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateWorkoutRequest>, WorkoutError>,
) -> Result<Json<Workout>, WorkoutError> {
    let id = parse_workout_id(&id)?;
    let workout = service.update(session.user_id, id, request).await?;
    Ok(Json(workout))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn delete_workout(
    State(service): State<WorkoutService>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> Result<StatusCode, WorkoutError> {
    let id = parse_workout_id(&id)?;
    service.delete(session.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
