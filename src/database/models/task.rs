use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{requested_status, RecordStatus};
use super::ValidationError;

pub const DEFAULT_TEST_REFERENCE: &str = "-";
pub const DEFAULT_HOURS: f64 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    pub morning: String,
    pub evening: String,
    pub test: String,
    pub subject: String,
    pub hours: f64,
    pub status: RecordStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by task create, update and bulk sync items.
/// `id` is only meaningful for bulk sync.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub id: Option<String>,
    pub date: Option<String>,
    pub morning: Option<String>,
    pub evening: Option<String>,
    pub test: Option<String>,
    pub subject: Option<String>,
    pub hours: Option<f64>,
    pub status: Option<RecordStatus>,
    pub is_active: Option<bool>,
}

/// Compact projection used by GET /api/data
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: Uuid,
    pub date: String,
    pub morning: String,
    pub evening: String,
    pub test: String,
    pub subject: String,
    pub hours: f64,
}

/// Optional list filters for GET /api/tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Two-digit month, matched as `-MM-` inside the date
    pub month: Option<String>,
    pub subject: Option<String>,
}

impl Task {
    pub fn create(input: &TaskInput, created_by: Option<Uuid>) -> Result<Self, ValidationError> {
        let date = required(&input.date, "date")?;
        let morning = required(&input.morning, "morning")?;
        let subject = required(&input.subject, "subject")?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            date,
            morning,
            evening: input.evening.clone().unwrap_or_default(),
            test: input.test.clone().unwrap_or_else(|| DEFAULT_TEST_REFERENCE.to_string()),
            subject,
            hours: input.hours.unwrap_or(DEFAULT_HOURS),
            status: input.requested_status().unwrap_or_default(),
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &TaskInput) {
        if let Some(date) = &patch.date {
            self.date = date.clone();
        }
        if let Some(morning) = &patch.morning {
            self.morning = morning.clone();
        }
        if let Some(evening) = &patch.evening {
            self.evening = evening.clone();
        }
        if let Some(test) = &patch.test {
            self.test = test.clone();
        }
        if let Some(subject) = &patch.subject {
            self.subject = subject.clone();
        }
        if let Some(hours) = patch.hours {
            self.hours = hours;
        }
        if let Some(status) = patch.requested_status() {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id,
            date: self.date.clone(),
            morning: self.morning.clone(),
            evening: self.evening.clone(),
            test: self.test.clone(),
            subject: self.subject.clone(),
            hours: self.hours,
        }
    }
}

impl TaskInput {
    pub fn requested_status(&self) -> Option<RecordStatus> {
        requested_status(self.status, self.is_active)
    }
}

impl TaskFilter {
    /// Build from raw query values. The month may be unpadded (`3` or `03`).
    pub fn from_query(month: Option<&str>, subject: Option<String>) -> Result<Self, ValidationError> {
        let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(m) if (1..=12).contains(&m) => Some(format!("{:02}", m)),
                _ => return Err(ValidationError::new(format!("Invalid month '{}'", raw))),
            },
            None => None,
        };

        Ok(Self {
            month,
            subject: subject.filter(|s| !s.is_empty()),
        })
    }

    pub fn matches(&self, task: &Task) -> bool {
        let month_ok = self
            .month
            .as_ref()
            .map_or(true, |m| task.date.contains(&format!("-{}-", m)));
        let subject_ok = self.subject.as_ref().map_or(true, |s| &task.subject == s);
        task.status.is_active() && month_ok && subject_ok
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::new(format!("Task {} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TaskInput {
        TaskInput {
            date: Some("2026-02-03".into()),
            morning: Some("Read Laxmikanth ch. 4".into()),
            subject: Some("Polity".into()),
            ..Default::default()
        }
    }

    #[test]
    fn create_applies_defaults() {
        let task = Task::create(&input(), None).unwrap();
        assert_eq!(task.evening, "");
        assert_eq!(task.test, "-");
        assert_eq!(task.hours, 3.0);
        assert!(task.status.is_active());
    }

    #[test]
    fn create_requires_subject() {
        let mut input = input();
        input.subject = Some("  ".into());
        let err = Task::create(&input, None).unwrap_err();
        assert_eq!(err.to_string(), "Task subject is required");
    }

    #[test]
    fn filter_matches_month_and_subject() {
        let task = Task::create(&input(), None).unwrap();

        let feb = TaskFilter { month: Some("02".into()), subject: None };
        let mar = TaskFilter { month: Some("03".into()), subject: None };
        let geo = TaskFilter { month: None, subject: Some("Geography".into()) };

        assert!(feb.matches(&task));
        assert!(!mar.matches(&task));
        assert!(!geo.matches(&task));
    }

    #[test]
    fn month_query_is_zero_padded() {
        let filter = TaskFilter::from_query(Some("2"), None).unwrap();
        assert_eq!(filter.month.as_deref(), Some("02"));

        assert!(TaskFilter::from_query(Some("13"), None).is_err());
        assert!(TaskFilter::from_query(Some("feb"), None).is_err());
        assert!(TaskFilter::from_query(Some(""), None).unwrap().month.is_none());
    }

    #[test]
    fn apply_is_partial() {
        let mut task = Task::create(&input(), None).unwrap();
        task.apply(&TaskInput {
            hours: Some(4.5),
            is_active: Some(false),
            ..Default::default()
        });

        assert_eq!(task.hours, 4.5);
        assert_eq!(task.morning, "Read Laxmikanth ch. 4");
        assert_eq!(task.status, RecordStatus::Inactive);
    }
}
