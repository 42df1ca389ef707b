use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{MockTest, ProgressData, StudySession, Task, TaskFilter, TestType};
use crate::database::Store;

use super::ServiceError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub overview: Overview,
    pub subject_stats: BTreeMap<String, SubjectStats>,
    pub test_performance: Vec<TestPerformance>,
    pub study_sessions: Vec<StudySession>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_tasks: usize,
    pub completed_count: usize,
    pub progress_percentage: i64,
    pub total_study_hours: f64,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SubjectStats {
    pub total: usize,
    pub completed: usize,
    /// Planned hours of the completed tasks
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct TestPerformance {
    pub number: i32,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub mcqs: i32,
    pub score: Option<f64>,
    pub percentage: Option<i64>,
}

/// Per-user statistics over the active catalog
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Reads only; a user without a progress record gets zeroed statistics.
    pub async fn for_user(&self, user_id: Uuid) -> Result<Analytics, ServiceError> {
        let progress = self
            .store
            .find_progress(user_id)
            .await?
            .map(|p| p.data)
            .unwrap_or_default();
        let tasks = self.store.list_tasks(&TaskFilter::default()).await?;
        let tests = self.store.list_tests().await?;

        Ok(compute(progress, &tasks, &tests))
    }
}

pub fn compute(progress: ProgressData, tasks: &[Task], tests: &[MockTest]) -> Analytics {
    let completed = &progress.completed_tasks;
    let is_done = |task: &Task| completed.get(&task.id.to_string()).copied().unwrap_or(false);

    let total_tasks = tasks.len();
    let completed_count = completed.values().filter(|done| **done).count();
    let progress_percentage = if total_tasks == 0 {
        0
    } else {
        (completed_count as f64 / total_tasks as f64 * 100.0).round() as i64
    };

    let mut subject_stats: BTreeMap<String, SubjectStats> = BTreeMap::new();
    for task in tasks {
        let stats = subject_stats.entry(task.subject.clone()).or_default();
        stats.total += 1;
        if is_done(task) {
            stats.completed += 1;
            stats.hours += task.hours;
        }
    }

    let test_performance = tests
        .iter()
        .map(|test| {
            let score = progress.test_scores.get(&test.id.to_string()).copied();
            let percentage = match score {
                Some(score) if test.mcqs > 0 => Some((score / test.mcqs as f64 * 100.0).round() as i64),
                _ => None,
            };
            TestPerformance {
                number: test.number,
                test_type: test.test_type,
                mcqs: test.mcqs,
                score,
                percentage,
            }
        })
        .collect();

    let total_study_hours = progress
        .study_sessions
        .iter()
        .fold(0.0, |sum, s| sum + s.duration);

    Analytics {
        overview: Overview {
            total_tasks,
            completed_count,
            progress_percentage,
            total_study_hours,
        },
        subject_stats,
        test_performance,
        study_sessions: progress.study_sessions,
    }
}
