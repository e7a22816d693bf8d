use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A strength-training entry owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Workout {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub reps: i32,
    pub load: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Body of `POST /api/workouts`.
///
/// Every field is optional at the wire level so that a request missing
/// several of them can be rejected with the full list at once.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(range(min = 0, message = "reps must be zero or greater"))]
    pub reps: Option<i32>,
    #[validate(range(min = 0.0, message = "load must be zero or greater"))]
    pub load: Option<f64>,
}

impl CreateWorkoutRequest {
    /// Names of the required fields absent from the request.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_none() {
            missing.push("title");
        }
        if self.reps.is_none() {
            missing.push("reps");
        }
        if self.load.is_none() {
            missing.push("load");
        }
        missing
    }
}

/// Body of `PATCH /api/workouts/:id`. Identity and timestamps are not
/// patchable; unknown keys such as `_id` or `createdAt` are ignored.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    #[validate(custom(function = "validate_title"))]
    pub title: Option<String>,
    #[validate(range(min = 0, message = "reps must be zero or greater"))]
    pub reps: Option<i32>,
    #[validate(range(min = 0.0, message = "load must be zero or greater"))]
    pub load: Option<f64>,
}

/// A validated workout ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub title: String,
    pub reps: i32,
    pub load: f64,
}

/// A validated partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkoutChanges {
    pub title: Option<String>,
    pub reps: Option<i32>,
    pub load: Option<f64>,
}

impl WorkoutChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.reps.is_none() && self.load.is_none()
    }
}

/// Selection criteria for listing workouts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutFilter {
    pub user_id: Option<Uuid>,
}

impl WorkoutFilter {
    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("title must not be blank".into());
        return Err(error);
    }
    Ok(())
}
