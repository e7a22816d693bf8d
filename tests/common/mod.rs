// Shared fixtures for the HTTP-level tests: in-memory repositories and a
// per-test application with its own users and workouts.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use fake::{faker::internet::en::SafeEmail, Fake};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use workout_api::auth::JwtService;
use workout_api::models::{NewUser, NewWorkout, User, Workout, WorkoutChanges, WorkoutFilter};
use workout_api::repositories::{RepositoryError, UserRepository, WorkoutRepository};
use workout_api::{create_routes, AppState};

pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";
pub const TEST_PASSWORD: &str = "R3g5T7#gh";

#[derive(Default)]
pub struct InMemoryWorkoutRepository {
    workouts: Mutex<Vec<Workout>>,
}

impl InMemoryWorkoutRepository {
    pub fn len(&self) -> usize {
        self.workouts.lock().unwrap().len()
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryWorkoutRepository {
    async fn create(&self, user_id: Uuid, workout: NewWorkout) -> Result<Workout, RepositoryError> {
        let now = Utc::now();
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id,
            title: workout.title,
            reps: workout.reps,
            load: workout.load,
            created_at: now,
            updated_at: now,
        };
        self.workouts.lock().unwrap().push(workout.clone());
        Ok(workout)
    }

    async fn find_all(&self, filter: WorkoutFilter) -> Result<Vec<Workout>, RepositoryError> {
        let workouts = self.workouts.lock().unwrap();
        Ok(workouts
            .iter()
            .rev()
            .filter(|w| filter.user_id.map_or(true, |user_id| w.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Workout, RepositoryError> {
        self.workouts
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update(&self, id: Uuid, changes: WorkoutChanges) -> Result<Workout, RepositoryError> {
        let mut workouts = self.workouts.lock().unwrap();
        let workout = workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        if let Some(title) = changes.title {
            workout.title = title;
        }
        if let Some(reps) = changes.reps {
            workout.reps = reps;
        }
        if let Some(load) = changes.load {
            workout.load = load;
        }
        workout.updated_at = Utc::now();

        Ok(workout.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut workouts = self.workouts.lock().unwrap();
        let before = workouts.len();
        workouts.retain(|w| w.id != id);

        if workouts.len() == before {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Drop an account, leaving any tokens issued to it dangling.
    pub fn remove(&self, email: &str) {
        self.users.lock().unwrap().retain(|u| u.email != email);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn is_json(&self) -> bool {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"))
    }
}

/// One application instance per test, with fresh repositories.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub workouts: Arc<InMemoryWorkoutRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let workouts = Arc::new(InMemoryWorkoutRepository::default());

        let mut state = AppState::new(
            users.clone(),
            workouts.clone(),
            JwtService::new(TEST_SECRET, Duration::hours(1)),
        );
        state.auth_service = state.auth_service.clone().with_bcrypt_cost(4);

        Self {
            router: create_routes(state),
            users,
            workouts,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request with an optional `bearer` token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn signup(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/user/signup",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Sign up a fresh random user and return its email and token.
    pub async fn signup_user(&self) -> (String, String) {
        let tag = Uuid::new_v4().simple().to_string();
        let email = format!("{}.{}", &tag[..8], SafeEmail().fake::<String>());
        let response = self.signup(&email, TEST_PASSWORD).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let token = response.body["token"].as_str().unwrap().to_string();
        (email.to_lowercase(), token)
    }
}
