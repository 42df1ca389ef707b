use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::manager::DatabaseManager;
use super::models::{
    MockTest, MockTestInput, ProgressData, RecordStatus, Routine, RoutineType, ScheduleEntry,
    Setting, Subject, SubjectInput, Task, TaskFilter, TaskInput, User, UserProgress,
};
use super::store::{Store, StoreError};

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, created_at, last_login";
const SUBJECT_COLUMNS: &str = "id, name, description, color, icon, sort_order, status, created_at";
const TASK_COLUMNS: &str =
    "id, date, morning, evening, test, subject, hours, status, created_by, created_at, updated_at";
const TEST_COLUMNS: &str = "id, number, date, test_type, mcqs, focus, target, status, created_at";

/// Postgres-backed store. Documents with free-form shape (progress, routine
/// schedules, setting values) live in JSONB columns.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct ProgressRow {
    user_id: Uuid,
    document: Json<ProgressData>,
    updated_at: DateTime<Utc>,
}

impl From<ProgressRow> for UserProgress {
    fn from(row: ProgressRow) -> Self {
        Self {
            user_id: row.user_id,
            data: row.document.0,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct RoutineRow {
    routine_type: RoutineType,
    schedule: Json<Vec<ScheduleEntry>>,
    updated_at: DateTime<Utc>,
}

impl From<RoutineRow> for Routine {
    fn from(row: RoutineRow) -> Self {
        Self {
            routine_type: row.routine_type,
            schedule: row.schedule.0,
            updated_at: row.updated_at,
        }
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-key violation into `Conflict(message)`; pass everything else through.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, is_admin, created_at, last_login)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.last_login)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already registered"))?;
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn toggle_admin(&self, id: Uuid) -> Result<Option<bool>, StoreError> {
        let row: Option<(bool,)> =
            sqlx::query_as("UPDATE users SET is_admin = NOT is_admin WHERE id = $1 RETURNING is_admin")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(is_admin,)| is_admin))
    }

    async fn find_progress(&self, user_id: Uuid) -> Result<Option<UserProgress>, StoreError> {
        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT user_id, document, updated_at FROM user_progress WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserProgress::from))
    }

    async fn get_or_create_progress(&self, user_id: Uuid) -> Result<UserProgress, StoreError> {
        // Concurrent first reads race here; DO NOTHING makes the loser a no-op.
        sqlx::query(
            "INSERT INTO user_progress (user_id, document, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(Json(ProgressData::default()))
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, ProgressRow>(
            "SELECT user_id, document, updated_at FROM user_progress WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_progress (user_id, document, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE
             SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at",
        )
        .bind(progress.user_id)
        .bind(Json(&progress.data))
        .bind(progress.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_subjects(&self, active_only: bool) -> Result<Vec<Subject>, StoreError> {
        let sql = format!(
            "SELECT {} FROM subjects
             WHERE ($1 = FALSE OR status = 'active')
             ORDER BY sort_order, created_at",
            SUBJECT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Subject>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_subjects(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn insert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO subjects (id, name, description, color, icon, sort_order, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(subject.id)
        .bind(&subject.name)
        .bind(&subject.description)
        .bind(&subject.color)
        .bind(&subject.icon)
        .bind(subject.order)
        .bind(subject.status)
        .bind(subject.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Subject already exists"))?;
        Ok(())
    }

    async fn update_subject(&self, id: Uuid, patch: &SubjectInput) -> Result<Option<Subject>, StoreError> {
        let sql = format!(
            "UPDATE subjects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                icon = COALESCE($5, icon),
                sort_order = COALESCE($6, sort_order),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {}",
            SUBJECT_COLUMNS
        );
        sqlx::query_as::<_, Subject>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.color)
            .bind(&patch.icon)
            .bind(patch.order)
            .bind(patch.requested_status())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "Subject already exists"))
    }

    async fn set_subject_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE subjects SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE status = 'active'
               AND ($1::text IS NULL OR date LIKE '%-' || $1 || '-%')
               AND ($2::text IS NULL OR subject = $2)
             ORDER BY date, created_at",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(&filter.month)
            .bind(&filter.subject)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tasks
                (id, date, morning, evening, test, subject, hours, status, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(task.id)
        .bind(&task.date)
        .bind(&task.morning)
        .bind(&task.evening)
        .bind(&task.test)
        .bind(&task.subject)
        .bind(task.hours)
        .bind(task.status)
        .bind(task.created_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_task(&self, id: Uuid, patch: &TaskInput) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "UPDATE tasks SET
                date = COALESCE($2, date),
                morning = COALESCE($3, morning),
                evening = COALESCE($4, evening),
                test = COALESCE($5, test),
                subject = COALESCE($6, subject),
                hours = COALESCE($7, hours),
                status = COALESCE($8, status),
                updated_at = now()
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(&patch.date)
            .bind(&patch.morning)
            .bind(&patch.evening)
            .bind(&patch.test)
            .bind(&patch.subject)
            .bind(patch.hours)
            .bind(patch.requested_status())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_task_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE tasks SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tests(&self) -> Result<Vec<MockTest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tests WHERE status = 'active' ORDER BY number, created_at",
            TEST_COLUMNS
        );
        Ok(sqlx::query_as::<_, MockTest>(&sql).fetch_all(&self.pool).await?)
    }

    async fn insert_test(&self, test: &MockTest) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tests (id, number, date, test_type, mcqs, focus, target, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(test.id)
        .bind(test.number)
        .bind(&test.date)
        .bind(test.test_type)
        .bind(test.mcqs)
        .bind(&test.focus)
        .bind(test.target)
        .bind(test.status)
        .bind(test.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_test(&self, id: Uuid, patch: &MockTestInput) -> Result<Option<MockTest>, StoreError> {
        let sql = format!(
            "UPDATE tests SET
                number = COALESCE($2, number),
                date = COALESCE($3, date),
                test_type = COALESCE($4, test_type),
                mcqs = COALESCE($5, mcqs),
                focus = COALESCE($6, focus),
                target = COALESCE($7, target),
                status = COALESCE($8, status)
             WHERE id = $1
             RETURNING {}",
            TEST_COLUMNS
        );
        Ok(sqlx::query_as::<_, MockTest>(&sql)
            .bind(id)
            .bind(patch.number)
            .bind(&patch.date)
            .bind(patch.test_type)
            .bind(patch.mcqs)
            .bind(&patch.focus)
            .bind(patch.target)
            .bind(patch.requested_status())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_test_status(&self, id: Uuid, status: RecordStatus) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE tests SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_routines(&self) -> Result<Vec<Routine>, StoreError> {
        let rows = sqlx::query_as::<_, RoutineRow>(
            "SELECT routine_type, schedule, updated_at FROM routines ORDER BY routine_type",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Routine::from).collect())
    }

    async fn upsert_routine(
        &self,
        routine_type: RoutineType,
        schedule: &[ScheduleEntry],
    ) -> Result<Routine, StoreError> {
        let row = sqlx::query_as::<_, RoutineRow>(
            "INSERT INTO routines (routine_type, schedule, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (routine_type) DO UPDATE
             SET schedule = EXCLUDED.schedule, updated_at = EXCLUDED.updated_at
             RETURNING routine_type, schedule, updated_at",
        )
        .bind(routine_type)
        .bind(Json(schedule))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, StoreError> {
        Ok(sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_setting(&self, key: &str) -> Result<Option<Setting>, StoreError> {
        Ok(
            sqlx::query_as::<_, Setting>("SELECT key, value, updated_at FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn put_setting(&self, key: &str, value: &Value) -> Result<Setting, StoreError> {
        Ok(sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (key, value, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (key) DO UPDATE
             SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
             RETURNING key, value, updated_at",
        )
        .bind(key)
        .bind(Json(value))
        .fetch_one(&self.pool)
        .await?)
    }
}
