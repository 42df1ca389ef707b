use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{requested_status, RecordStatus};
use super::ValidationError;

pub const DEFAULT_COLOR: &str = "#667eea";
pub const DEFAULT_ICON: &str = "📚";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

/// Body accepted by subject create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub status: Option<RecordStatus>,
    pub is_active: Option<bool>,
}

impl Subject {
    /// Plain active subject, as created by bulk sync and seeding.
    pub fn named(name: &str, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            color: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            order,
            status: RecordStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn create(input: &SubjectInput, order: i32) -> Result<Self, ValidationError> {
        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ValidationError::new("Subject name is required"))?;

        let mut subject = Self::named(name, order);
        subject.description = input.description.clone();
        if let Some(color) = &input.color {
            subject.color = color.clone();
        }
        if let Some(icon) = &input.icon {
            subject.icon = icon.clone();
        }
        Ok(subject)
    }

    pub fn apply(&mut self, patch: &SubjectInput) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = icon.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(status) = patch.requested_status() {
            self.status = status;
        }
    }
}

impl SubjectInput {
    pub fn requested_status(&self) -> Option<RecordStatus> {
        requested_status(self.status, self.is_active)
    }

    /// Patch used by bulk sync to bring an inactive subject back at a new position.
    pub fn reactivate(order: i32) -> Self {
        Self {
            order: Some(order),
            status: Some(RecordStatus::Active),
            ..Default::default()
        }
    }
}
