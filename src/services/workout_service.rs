use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::WorkoutError;
use crate::models::{
    CreateWorkoutRequest, NewWorkout, UpdateWorkoutRequest, Workout, WorkoutChanges, WorkoutFilter,
};
use crate::repositories::WorkoutRepository;

/// Validates workout payloads, enforces ownership and delegates storage to
/// a [`WorkoutRepository`].
#[derive(Clone)]
pub struct WorkoutService {
    repository: Arc<dyn WorkoutRepository>,
}

impl WorkoutService {
    pub fn new(repository: Arc<dyn WorkoutRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateWorkoutRequest,
    ) -> Result<Workout, WorkoutError> {
        let workout = validate_new_workout(request)?;
        let workout = self.repository.create(user_id, workout).await?;

        info!(workout_id = %workout.id, %user_id, "workout created");
        Ok(workout)
    }

    /// Every workout owned by `user_id`, newest first.
    pub async fn find_all(&self, user_id: Uuid) -> Result<Vec<Workout>, WorkoutError> {
        Ok(self.repository.find_all(WorkoutFilter::owned_by(user_id)).await?)
    }

    pub async fn find_by_id(&self, user_id: Uuid, id: Uuid) -> Result<Workout, WorkoutError> {
        let workout = self.repository.find_by_id(id).await?;

        if !workout.is_owned_by(user_id) {
            warn!(workout_id = %id, %user_id, "access to another user's workout denied");
            return Err(WorkoutError::Forbidden);
        }

        Ok(workout)
    }

    /// Apply a partial update. Existence and ownership are checked before
    /// the payload is validated.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateWorkoutRequest,
    ) -> Result<Workout, WorkoutError> {
        self.find_by_id(user_id, id).await?;

        let changes = validate_changes(request)?;
        let workout = self.repository.update(id, changes).await?;

        info!(workout_id = %id, %user_id, "workout updated");
        Ok(workout)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), WorkoutError> {
        self.find_by_id(user_id, id).await?;
        self.repository.delete(id).await?;

        info!(workout_id = %id, %user_id, "workout deleted");
        Ok(())
    }
}

fn validate_new_workout(request: CreateWorkoutRequest) -> Result<NewWorkout, WorkoutError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(WorkoutError::MissingFields(missing));
    }
    request.validate()?;

    match (request.title, request.reps, request.load) {
        (Some(title), Some(reps), Some(load)) => Ok(NewWorkout {
            title: title.trim().to_string(),
            reps,
            load: finite_load(load)?,
        }),
        _ => Err(WorkoutError::MissingFields(missing)),
    }
}

fn validate_changes(request: UpdateWorkoutRequest) -> Result<WorkoutChanges, WorkoutError> {
    request.validate()?;

    let changes = WorkoutChanges {
        title: request.title.map(|title| title.trim().to_string()),
        reps: request.reps,
        load: request.load.map(finite_load).transpose()?,
    };

    if changes.is_empty() {
        return Err(WorkoutError::Validation(
            "Update must include at least one of: title, reps, load".to_string(),
        ));
    }

    Ok(changes)
}

fn finite_load(load: f64) -> Result<f64, WorkoutError> {
    if load.is_finite() {
        Ok(load)
    } else {
        Err(WorkoutError::Validation("load must be a finite number".to_string()))
    }
}
