use std::sync::Arc;

use crate::auth::hash_password;
use crate::config::SeedConfig;
use crate::database::models::{MockTest, RecordStatus, RoutineType, ScheduleEntry, Subject, TestType, User};
use crate::database::{Store, StoreError};

use super::ServiceError;

pub const DEFAULT_SUBJECTS: [&str; 8] = [
    "Polity",
    "History",
    "Geography",
    "Economy",
    "Science",
    "Environment",
    "Current Affairs",
    "General",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded,
}

/// One-shot bootstrap of the default curriculum and the admin account
pub struct SeedService {
    store: Arc<dyn Store>,
    seed: SeedConfig,
    bcrypt_cost: u32,
}

impl SeedService {
    pub fn new(store: Arc<dyn Store>, seed: &SeedConfig, bcrypt_cost: u32) -> Self {
        Self {
            store,
            seed: seed.clone(),
            bcrypt_cost,
        }
    }

    /// No-op when any subject exists, active or not.
    pub async fn run(&self) -> Result<SeedOutcome, ServiceError> {
        if self.store.count_subjects().await? > 0 {
            tracing::info!("Catalog already seeded");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        tracing::info!("Seeding default catalog");

        for (order, name) in DEFAULT_SUBJECTS.iter().enumerate() {
            self.store.insert_subject(&Subject::named(name, order as i32)).await?;
        }

        for routine_type in RoutineType::ALL {
            self.store
                .upsert_routine(routine_type, &default_routine(routine_type))
                .await?;
        }

        for test in default_tests() {
            self.store.insert_test(&test).await?;
        }

        self.seed_admin().await?;

        tracing::info!("Catalog seeded");
        Ok(SeedOutcome::Seeded)
    }

    async fn seed_admin(&self) -> Result<(), ServiceError> {
        let hash = hash_password(&self.seed.admin_password, self.bcrypt_cost).await?;
        let admin = User::new(&self.seed.admin_name, &self.seed.admin_email, hash, true);

        match self.store.insert_user(&admin).await {
            Ok(()) => {
                self.store.get_or_create_progress(admin.id).await?;
                tracing::info!("Created admin account {}", admin.email);
                Ok(())
            }
            Err(StoreError::Conflict(_)) => {
                tracing::warn!("Admin account {} already exists, leaving it alone", admin.email);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub fn default_routine(routine_type: RoutineType) -> Vec<ScheduleEntry> {
    let rows: &[(&str, &str, &str, &str)] = match routine_type {
        RoutineType::Weekday => &[
            ("05:30 - 06:00", "Wake Up & Freshen", "Morning routine, light exercise", "30 min"),
            ("06:00 - 08:00", "Morning Study Block", "Theory reading - Primary subject", "2 hrs"),
            ("08:00 - 09:00", "Breakfast & Break", "News reading, current affairs", "1 hr"),
            ("09:00 - 18:00", "Office/Work", "Professional commitments", "9 hrs"),
            ("18:00 - 19:00", "Evening Break", "Rest, snacks, light walk", "1 hr"),
            ("19:00 - 21:00", "Evening Study Block", "MCQ practice, revision", "2 hrs"),
            ("21:00 - 22:00", "Dinner & Relaxation", "Light reading, family time", "1 hr"),
            ("22:00 - 22:30", "Quick Revision", "Day recap, next day planning", "30 min"),
        ],
        RoutineType::Saturday => &[
            ("06:00 - 08:00", "Morning Theory", "Subject deep dive", "2 hrs"),
            ("08:00 - 09:00", "Breakfast", "Current affairs reading", "1 hr"),
            ("09:00 - 12:00", "Intensive Study", "Primary subject completion", "3 hrs"),
            ("12:00 - 14:00", "Lunch & Break", "Rest and refresh", "2 hrs"),
            ("14:00 - 17:00", "MCQ Practice", "Subject-wise practice", "3 hrs"),
            ("17:00 - 19:00", "Revision", "Week summary revision", "2 hrs"),
        ],
        RoutineType::Sunday => &[
            ("07:00 - 09:00", "Light Morning Study", "Weak area focus", "2 hrs"),
            ("09:00 - 11:00", "Mock Test", "Weekly assessment", "2 hrs"),
            ("11:00 - 13:00", "Test Analysis", "Error log, learning", "2 hrs"),
            ("13:00 - 16:00", "Break & Lunch", "Complete rest", "3 hrs"),
            ("16:00 - 18:00", "Next Week Planning", "Schedule preparation", "2 hrs"),
        ],
    };

    rows.iter()
        .map(|(time, activity, details, duration)| ScheduleEntry::new(time, activity, details, duration))
        .collect()
}

pub fn default_tests() -> Vec<MockTest> {
    use TestType as T;

    let rows: [(i32, &str, TestType, i32, &str, f64); 15] = [
        (1, "2026-01-04", T::Subject, 50, "Polity + History", 40.0),
        (2, "2026-01-11", T::Subject, 50, "Geography + Economy", 40.0),
        (3, "2026-01-18", T::Mixed, 75, "GS Comprehensive", 60.0),
        (4, "2026-01-25", T::Mixed, 75, "All Subjects", 60.0),
        (5, "2026-01-31", T::Mixed, 75, "Polity Heavy", 60.0),
        (6, "2026-02-01", T::Subject, 75, "Environment", 60.0),
        (7, "2026-02-07", T::Mixed, 75, "History Focus", 60.0),
        (8, "2026-02-08", T::Mixed, 75, "Polity + Geo", 60.0),
        (9, "2026-02-14", T::Mixed, 75, "Weak Areas", 60.0),
        (10, "2026-02-15", T::Full, 100, "Science Focus", 80.0),
        (11, "2026-02-21", T::Full, 100, "Complete GS", 80.0),
        (12, "2026-02-22", T::Full, 100, "Current Affairs", 80.0),
        (13, "2026-03-07", T::FullMock, 200, "Exam Simulation", 160.0),
        (14, "2026-03-08", T::FullMock, 200, "Exam Simulation", 160.0),
        (15, "2026-03-14", T::FinalMock, 200, "Final Simulation", 170.0),
    ];

    rows.into_iter()
        .map(|(number, date, test_type, mcqs, focus, target)| MockTest {
            id: uuid::Uuid::new_v4(),
            number,
            date: date.to_string(),
            test_type,
            mcqs,
            focus: focus.to_string(),
            target,
            status: RecordStatus::Active,
            created_at: chrono::Utc::now(),
        })
        .collect()
}
