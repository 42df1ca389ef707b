use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    MockTest, MockTestInput, RecordStatus, Routine, RoutineType, ScheduleEntry, Setting, Subject,
    SubjectInput, Task, TaskFilter, TaskInput, User, UserProgress,
};

/// Errors from a Store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key already taken (email, subject name)
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for users, per-user progress and the shared catalog.
///
/// Every method touches a single record or a single collection scan; there are
/// no multi-record transactions, so concurrent writers to the same record are
/// last-writer-wins.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Users

    /// Fails with `Conflict` if the (normalized) email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;
    /// Flip the admin flag, returning the new value, or `None` for an unknown user.
    async fn toggle_admin(&self, id: Uuid) -> Result<Option<bool>, StoreError>;

    // Progress

    async fn find_progress(&self, user_id: Uuid) -> Result<Option<UserProgress>, StoreError>;
    /// Insert an empty record if none exists, then return the stored one.
    async fn get_or_create_progress(&self, user_id: Uuid) -> Result<UserProgress, StoreError>;
    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StoreError>;

    // Subjects

    /// Ordered by display order. `active_only` hides soft-deleted rows.
    async fn list_subjects(&self, active_only: bool) -> Result<Vec<Subject>, StoreError>;
    async fn count_subjects(&self) -> Result<i64, StoreError>;
    /// Fails with `Conflict` if the name is taken.
    async fn insert_subject(&self, subject: &Subject) -> Result<(), StoreError>;
    async fn update_subject(&self, id: Uuid, patch: &SubjectInput) -> Result<Option<Subject>, StoreError>;
    async fn set_subject_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError>;

    // Tasks

    /// Active tasks matching `filter`, ordered by date.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn update_task(&self, id: Uuid, patch: &TaskInput) -> Result<Option<Task>, StoreError>;
    async fn set_task_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError>;

    // Tests

    /// Active tests ordered by sequence number.
    async fn list_tests(&self) -> Result<Vec<MockTest>, StoreError>;
    async fn insert_test(&self, test: &MockTest) -> Result<(), StoreError>;
    async fn update_test(&self, id: Uuid, patch: &MockTestInput) -> Result<Option<MockTest>, StoreError>;
    async fn set_test_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError>;

    // Routines

    async fn list_routines(&self) -> Result<Vec<Routine>, StoreError>;
    /// Replace the schedule of `routine_type`, creating the routine if needed.
    async fn upsert_routine(
        &self,
        routine_type: RoutineType,
        schedule: &[ScheduleEntry],
    ) -> Result<Routine, StoreError>;

    // Settings

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError>;
    async fn find_setting(&self, key: &str) -> Result<Option<Setting>, StoreError>;
    async fn put_setting(&self, key: &str, value: &Value) -> Result<Setting, StoreError>;
}
