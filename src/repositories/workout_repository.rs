use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::{NewWorkout, Workout, WorkoutChanges, WorkoutFilter};

/// Persistence boundary for workouts.
///
/// Implementations assign identifiers and timestamps; callers hand over
/// already-validated values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Store a new workout for `user_id` and return the stored record.
    async fn create(&self, user_id: Uuid, workout: NewWorkout) -> Result<Workout, RepositoryError>;

    /// All workouts matching `filter`, newest first.
    async fn find_all(&self, filter: WorkoutFilter) -> Result<Vec<Workout>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Workout, RepositoryError>;

    /// Merge `changes` into the stored workout and refresh `updated_at`.
    async fn update(&self, id: Uuid, changes: WorkoutChanges) -> Result<Workout, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgWorkoutRepository {
    db: PgPool,
}

impl PgWorkoutRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkoutRepository for PgWorkoutRepository {
    async fn create(&self, user_id: Uuid, workout: NewWorkout) -> Result<Workout, RepositoryError> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (id, user_id, title, reps, load, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, user_id, title, reps, load, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&workout.title)
        .bind(workout.reps)
        .bind(workout.load)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(RepositoryError::from_write)?;

        debug!(workout_id = %workout.id, "workout inserted");
        Ok(workout)
    }

    async fn find_all(&self, filter: WorkoutFilter) -> Result<Vec<Workout>, RepositoryError> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, title, reps, load, created_at, updated_at
            FROM workouts
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(workouts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Workout, RepositoryError> {
        sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, title, reps, load, created_at, updated_at FROM workouts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn update(&self, id: Uuid, changes: WorkoutChanges) -> Result<Workout, RepositoryError> {
        sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
            SET title = COALESCE($2, title),
                reps = COALESCE($3, reps),
                load = COALESCE($4, load),
                updated_at = $5
            WHERE id = $1
            RETURNING id, user_id, title, reps, load, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.reps)
        .bind(changes.load)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        debug!(workout_id = %id, "workout deleted");
        Ok(())
    }
}
