use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{requested_status, RecordStatus};
use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "test_type")]
pub enum TestType {
    Subject,
    #[default]
    Mixed,
    Full,
    #[serde(rename = "Full Mock")]
    #[sqlx(rename = "Full Mock")]
    FullMock,
    #[serde(rename = "Final Mock")]
    #[sqlx(rename = "Final Mock")]
    FinalMock,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MockTest {
    pub id: Uuid,
    pub number: i32,
    pub date: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub mcqs: i32,
    pub focus: String,
    pub target: f64,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

/// Body accepted by test create, update and bulk sync items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTestInput {
    pub id: Option<String>,
    pub number: Option<i32>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub test_type: Option<TestType>,
    pub mcqs: Option<i32>,
    pub focus: Option<String>,
    pub target: Option<f64>,
    pub status: Option<RecordStatus>,
    pub is_active: Option<bool>,
}

/// Compact projection used by GET /api/data
#[derive(Debug, Clone, Serialize)]
pub struct MockTestSummary {
    pub id: Uuid,
    pub number: i32,
    pub date: String,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub mcqs: i32,
    pub focus: String,
    pub target: f64,
}

impl MockTest {
    pub fn create(input: &MockTestInput) -> Result<Self, ValidationError> {
        let missing = |field: &str| ValidationError::new(format!("Test {} is required", field));

        Ok(Self {
            id: Uuid::new_v4(),
            number: input.number.ok_or_else(|| missing("number"))?,
            date: input.date.clone().ok_or_else(|| missing("date"))?,
            test_type: input.test_type.unwrap_or_default(),
            mcqs: input.mcqs.ok_or_else(|| missing("mcqs"))?,
            focus: input.focus.clone().ok_or_else(|| missing("focus"))?,
            target: input.target.ok_or_else(|| missing("target"))?,
            status: input.requested_status().unwrap_or_default(),
            created_at: Utc::now(),
        })
    }

    pub fn apply(&mut self, patch: &MockTestInput) {
        if let Some(number) = patch.number {
            self.number = number;
        }
        if let Some(date) = &patch.date {
            self.date = date.clone();
        }
        if let Some(test_type) = patch.test_type {
            self.test_type = test_type;
        }
        if let Some(mcqs) = patch.mcqs {
            self.mcqs = mcqs;
        }
        if let Some(focus) = &patch.focus {
            self.focus = focus.clone();
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(status) = patch.requested_status() {
            self.status = status;
        }
    }

    pub fn summary(&self) -> MockTestSummary {
        MockTestSummary {
            id: self.id,
            number: self.number,
            date: self.date.clone(),
            test_type: self.test_type,
            mcqs: self.mcqs,
            focus: self.focus.clone(),
            target: self.target,
        }
    }
}

impl MockTestInput {
    pub fn requested_status(&self) -> Option<RecordStatus> {
        requested_status(self.status, self.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_uses_display_names() {
        let parsed: TestType = serde_json::from_str("\"Full Mock\"").unwrap();
        assert_eq!(parsed, TestType::FullMock);
        assert_eq!(serde_json::to_string(&TestType::FinalMock).unwrap(), "\"Final Mock\"");
        assert!(serde_json::from_str::<TestType>("\"Quiz\"").is_err());
    }

    #[test]
    fn create_defaults_to_mixed() {
        let input = MockTestInput {
            number: Some(16),
            date: Some("2026-03-21".into()),
            mcqs: Some(75),
            focus: Some("Revision".into()),
            target: Some(60.0),
            ..Default::default()
        };
        let test = MockTest::create(&input).unwrap();
        assert_eq!(test.test_type, TestType::Mixed);

        let err = MockTest::create(&MockTestInput::default()).unwrap_err();
        assert_eq!(err.to_string(), "Test number is required");
    }
}
