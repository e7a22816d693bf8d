use std::sync::Arc;

use axum::{extract::FromRef, routing::get, Router};
use chrono::Duration;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::user::user_routes;
use super::workouts::workout_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService, JwtService};
use crate::config::AppConfig;
use crate::repositories::{PgUserRepository, PgWorkoutRepository, UserRepository, WorkoutRepository};
use crate::services::WorkoutService;

/// Services shared by every handler. Built once at startup and cloned into
/// each request.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub workout_service: WorkoutService,
}

impl AppState {
    /// Wire the services over arbitrary repository implementations.
    pub fn new(
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, jwt_service),
            workout_service: WorkoutService::new(workouts),
        }
    }

    /// Wire the services over PostgreSQL.
    pub fn postgres(db: PgPool, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(
            &config.jwt_secret,
            Duration::hours(config.jwt_expires_in_hours),
        );

        Self::new(
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgWorkoutRepository::new(db)),
            jwt_service,
        )
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

impl FromRef<AppState> for WorkoutService {
    fn from_ref(state: &AppState) -> Self {
        state.workout_service.clone()
    }
}

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .nest("/user", user_routes())
        .nest("/workouts", workout_routes(state.auth_service.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
        .with_state(state)
}
