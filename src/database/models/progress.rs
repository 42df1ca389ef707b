use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// String-keyed mapping whose empty state is `{}` on the wire.
pub type KeyedMap<V> = BTreeMap<String, V>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTest {
    pub id: String,
    pub number: i32,
    pub date: String,
    #[serde(rename = "type", default = "default_custom_type")]
    pub test_type: String,
    #[serde(default = "default_custom_mcqs")]
    pub mcqs: i32,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub target: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_custom_type() -> String {
    "Mixed".to_string()
}

fn default_custom_mcqs() -> i32 {
    75
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Hours
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// The user-visible progress document. Every field defaults to its empty form,
/// so a stored document missing a field still reads back complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressData {
    pub completed_tasks: KeyedMap<bool>,
    pub test_scores: KeyedMap<f64>,
    pub custom_dates: KeyedMap<String>,
    pub custom_test_dates: KeyedMap<String>,
    pub custom_tests: Vec<CustomTest>,
    pub daily_notes: KeyedMap<String>,
    pub study_sessions: Vec<StudySession>,
    pub notes: String,
    pub dark_mode: bool,
}

#[derive(Debug, Clone)]
pub struct UserProgress {
    pub user_id: Uuid,
    pub data: ProgressData,
    pub updated_at: DateTime<Utc>,
}

impl UserProgress {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            data: ProgressData::default(),
            updated_at: Utc::now(),
        }
    }
}

/// Partial update body for PUT /api/progress. A field that is absent (or null)
/// leaves the stored value alone; anything else replaces it wholesale.
/// A null entry inside `testScores` clears that score.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPatch {
    pub completed_tasks: Option<KeyedMap<bool>>,
    pub test_scores: Option<KeyedMap<Option<f64>>>,
    pub custom_dates: Option<KeyedMap<String>>,
    pub custom_test_dates: Option<KeyedMap<String>>,
    pub custom_tests: Option<Vec<CustomTest>>,
    pub daily_notes: Option<KeyedMap<String>>,
    pub study_sessions: Option<Vec<StudySession>>,
    pub notes: Option<String>,
    pub dark_mode: Option<bool>,
}

impl ProgressPatch {
    pub fn apply_to(self, progress: &mut UserProgress) {
        let data = &mut progress.data;

        if let Some(v) = self.completed_tasks {
            data.completed_tasks = v;
        }
        if let Some(v) = self.test_scores {
            data.test_scores = v
                .into_iter()
                .filter_map(|(id, score)| score.map(|score| (id, score)))
                .collect();
        }
        if let Some(v) = self.custom_dates {
            data.custom_dates = v;
        }
        if let Some(v) = self.custom_test_dates {
            data.custom_test_dates = v;
        }
        if let Some(v) = self.custom_tests {
            data.custom_tests = v;
        }
        if let Some(v) = self.daily_notes {
            data.daily_notes = v;
        }
        if let Some(v) = self.study_sessions {
            data.study_sessions = v;
        }
        if let Some(v) = self.notes {
            data.notes = v;
        }
        if let Some(v) = self.dark_mode {
            data.dark_mode = v;
        }

        progress.updated_at = Utc::now();
    }
}
