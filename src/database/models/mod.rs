pub mod mock_test;
pub mod progress;
pub mod routine;
pub mod setting;
pub mod status;
pub mod subject;
pub mod task;
pub mod user;

pub use mock_test::{MockTest, MockTestInput, MockTestSummary, TestType};
pub use progress::{CustomTest, KeyedMap, ProgressData, ProgressPatch, StudySession, UserProgress};
pub use routine::{Routine, RoutineMap, RoutineType, ScheduleEntry};
pub use setting::Setting;
pub use status::RecordStatus;
pub use subject::{Subject, SubjectInput};
pub use task::{Task, TaskFilter, TaskInput, TaskSummary};
pub use user::{normalize_email, PublicUser, User, UserSummary};

/// A write body that is missing or has malformed fields.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ValidationError> for crate::error::ApiError {
    fn from(err: ValidationError) -> Self {
        crate::error::ApiError::bad_request(err.0)
    }
}
