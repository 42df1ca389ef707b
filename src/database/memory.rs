use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    MockTest, MockTestInput, RecordStatus, Routine, RoutineType, ScheduleEntry, Setting, Subject,
    SubjectInput, Task, TaskFilter, TaskInput, User, UserProgress,
};
use super::store::{Store, StoreError};

/// Process-local store used by the test suite and `serve --in-memory`.
/// Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    progress: HashMap<Uuid, UserProgress>,
    subjects: HashMap<Uuid, Subject>,
    tasks: HashMap<Uuid, Task>,
    tests: HashMap<Uuid, MockTest>,
    routines: HashMap<RoutineType, Routine>,
    settings: HashMap<String, Setting>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn subject_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.subjects
            .values()
            .any(|s| s.name == name && Some(s.id) != except)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let email = user.email.to_lowercase();
        if state.users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.state.read().await.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(user) = self.state.write().await.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn toggle_admin(&self, id: Uuid) -> Result<Option<bool>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.is_admin = !user.is_admin;
            user.is_admin
        }))
    }

    async fn find_progress(&self, user_id: Uuid) -> Result<Option<UserProgress>, StoreError> {
        Ok(self.state.read().await.progress.get(&user_id).cloned())
    }

    async fn get_or_create_progress(&self, user_id: Uuid) -> Result<UserProgress, StoreError> {
        let mut state = self.state.write().await;
        Ok(state
            .progress
            .entry(user_id)
            .or_insert_with(|| UserProgress::empty(user_id))
            .clone())
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .progress
            .insert(progress.user_id, progress.clone());
        Ok(())
    }

    async fn list_subjects(&self, active_only: bool) -> Result<Vec<Subject>, StoreError> {
        let state = self.state.read().await;
        let mut subjects: Vec<Subject> = state
            .subjects
            .values()
            .filter(|s| !active_only || s.status.is_active())
            .cloned()
            .collect();
        subjects.sort_by_key(|s| (s.order, s.created_at));
        Ok(subjects)
    }

    async fn count_subjects(&self) -> Result<i64, StoreError> {
        Ok(self.state.read().await.subjects.len() as i64)
    }

    async fn insert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.subject_name_taken(&subject.name, None) {
            return Err(StoreError::Conflict("Subject already exists".to_string()));
        }
        state.subjects.insert(subject.id, subject.clone());
        Ok(())
    }

    async fn update_subject(&self, id: Uuid, patch: &SubjectInput) -> Result<Option<Subject>, StoreError> {
        let mut state = self.state.write().await;
        if let Some(name) = &patch.name {
            if state.subject_name_taken(name, Some(id)) {
                return Err(StoreError::Conflict("Subject already exists".to_string()));
            }
        }
        Ok(state.subjects.get_mut(&id).map(|subject| {
            subject.apply(patch);
            subject.clone()
        }))
    }

    async fn set_subject_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(match state.subjects.get_mut(&id) {
            Some(subject) => {
                subject.status = status;
                true
            }
            None => false,
        })
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.state.write().await.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn update_task(&self, id: Uuid, patch: &TaskInput) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tasks.get_mut(&id).map(|task| {
            task.apply(patch);
            task.clone()
        }))
    }

    async fn set_task_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(match state.tasks.get_mut(&id) {
            Some(task) => {
                task.status = status;
                task.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn list_tests(&self) -> Result<Vec<MockTest>, StoreError> {
        let state = self.state.read().await;
        let mut tests: Vec<MockTest> = state
            .tests
            .values()
            .filter(|t| t.status.is_active())
            .cloned()
            .collect();
        tests.sort_by_key(|t| (t.number, t.created_at));
        Ok(tests)
    }

    async fn insert_test(&self, test: &MockTest) -> Result<(), StoreError> {
        self.state.write().await.tests.insert(test.id, test.clone());
        Ok(())
    }

    async fn update_test(&self, id: Uuid, patch: &MockTestInput) -> Result<Option<MockTest>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tests.get_mut(&id).map(|test| {
            test.apply(patch);
            test.clone()
        }))
    }

    async fn set_test_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Ok(match state.tests.get_mut(&id) {
            Some(test) => {
                test.status = status;
                true
            }
            None => false,
        })
    }

    async fn list_routines(&self) -> Result<Vec<Routine>, StoreError> {
        let mut routines: Vec<Routine> = self.state.read().await.routines.values().cloned().collect();
        routines.sort_by_key(|r| r.routine_type);
        Ok(routines)
    }

    async fn upsert_routine(
        &self,
        routine_type: RoutineType,
        schedule: &[ScheduleEntry],
    ) -> Result<Routine, StoreError> {
        let routine = Routine {
            routine_type,
            schedule: schedule.to_vec(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .routines
            .insert(routine_type, routine.clone());
        Ok(routine)
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError> {
        let mut settings: Vec<Setting> = self.state.read().await.settings.values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn find_setting(&self, key: &str) -> Result<Option<Setting>, StoreError> {
        Ok(self.state.read().await.settings.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &Value) -> Result<Setting, StoreError> {
        let setting = Setting {
            key: key.to_string(),
            value: value.clone(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .settings
            .insert(key.to_string(), setting.clone());
        Ok(setting)
    }
}
