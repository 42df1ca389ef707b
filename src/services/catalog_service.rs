use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{
    MockTest, MockTestInput, MockTestSummary, RecordStatus, Routine, RoutineMap, RoutineType,
    ScheduleEntry, Subject, SubjectInput, Task, TaskFilter, TaskInput, TaskSummary,
};
use crate::database::Store;

use super::ServiceError;

/// Compact catalog view served by GET /api/data
#[derive(Debug, Serialize)]
pub struct CatalogSnapshot {
    pub subjects: Vec<String>,
    pub tasks: Vec<TaskSummary>,
    pub tests: Vec<MockTestSummary>,
    pub routines: RoutineMap,
}

/// Body of PUT /api/data. Each section is optional and only touched when present.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSync {
    pub subjects: Option<Vec<String>>,
    pub tasks: Option<Vec<TaskInput>>,
    pub tests: Option<Vec<MockTestInput>>,
    pub routines: Option<BTreeMap<RoutineType, Vec<ScheduleEntry>>>,
}

/// Store writes needed to make the subject set match an incoming name list
#[derive(Debug, Default, PartialEq)]
pub struct SubjectPlan {
    pub create: Vec<(String, i32)>,
    pub reactivate: Vec<(Uuid, i32)>,
    pub deactivate: Vec<Uuid>,
}

/// Reconcile by name. A name keeps the position of its first occurrence.
pub fn plan_subject_sync(existing: &[Subject], incoming: &[String]) -> SubjectPlan {
    let mut plan = SubjectPlan::default();
    let mut seen = HashSet::new();

    for (index, name) in incoming.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let order = index as i32;
        match existing.iter().find(|s| &s.name == name) {
            None => plan.create.push((name.clone(), order)),
            Some(subject) if !subject.status.is_active() => plan.reactivate.push((subject.id, order)),
            Some(_) => {}
        }
    }

    plan.deactivate = existing
        .iter()
        .filter(|s| s.status.is_active() && !seen.contains(s.name.as_str()))
        .map(|s| s.id)
        .collect();

    plan
}

/// Ids arrive as path segments or bulk item fields; anything that is not a
/// stored id shape is treated as unknown.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Reads and writes over the shared curriculum: subjects, tasks, tests and routines.
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> Result<CatalogSnapshot, ServiceError> {
        let subjects = self.store.list_subjects(true).await?;
        let tasks = self.store.list_tasks(&TaskFilter::default()).await?;
        let tests = self.store.list_tests().await?;

        Ok(CatalogSnapshot {
            subjects: subjects.into_iter().map(|s| s.name).collect(),
            tasks: tasks.iter().map(Task::summary).collect(),
            tests: tests.iter().map(MockTest::summary).collect(),
            routines: self.routines().await?,
        })
    }

    /// Apply a bulk sync section by section. A failure stops the sync; writes
    /// made before it stay in place.
    pub async fn sync(&self, body: CatalogSync, caller: Uuid) -> Result<(), ServiceError> {
        if let Some(names) = &body.subjects {
            self.sync_subjects(names).await?;
        }

        if let Some(tasks) = &body.tasks {
            for item in tasks {
                match item.id.as_deref().and_then(parse_id) {
                    Some(id) => {
                        self.store.update_task(id, item).await?;
                    }
                    None => self.store.insert_task(&Task::create(item, Some(caller))?).await?,
                }
            }
        }

        if let Some(tests) = &body.tests {
            for item in tests {
                match item.id.as_deref().and_then(parse_id) {
                    Some(id) => {
                        self.store.update_test(id, item).await?;
                    }
                    None => self.store.insert_test(&MockTest::create(item)?).await?,
                }
            }
        }

        if let Some(routines) = &body.routines {
            for (routine_type, schedule) in routines {
                self.store.upsert_routine(*routine_type, schedule).await?;
            }
        }

        Ok(())
    }

    async fn sync_subjects(&self, names: &[String]) -> Result<(), ServiceError> {
        let existing = self.store.list_subjects(false).await?;
        let plan = plan_subject_sync(&existing, names);

        tracing::debug!(
            "Subject sync: {} new, {} reactivated, {} deactivated",
            plan.create.len(),
            plan.reactivate.len(),
            plan.deactivate.len()
        );

        for (name, order) in &plan.create {
            self.store.insert_subject(&Subject::named(name, *order)).await?;
        }
        for (id, order) in &plan.reactivate {
            self.store.update_subject(*id, &SubjectInput::reactivate(*order)).await?;
        }
        for id in &plan.deactivate {
            self.store.set_subject_status(*id, RecordStatus::Inactive).await?;
        }
        Ok(())
    }

    // Subjects

    pub async fn subjects(&self) -> Result<Vec<Subject>, ServiceError> {
        Ok(self.store.list_subjects(true).await?)
    }

    /// New subjects go to the end: `order` is the count of all subjects, inactive included.
    pub async fn create_subject(&self, input: &SubjectInput) -> Result<Subject, ServiceError> {
        let order = self.store.count_subjects().await? as i32;
        let subject = Subject::create(input, order)?;
        self.store.insert_subject(&subject).await?;
        Ok(subject)
    }

    pub async fn update_subject(&self, id: &str, input: &SubjectInput) -> Result<Option<Subject>, ServiceError> {
        match parse_id(id) {
            Some(id) => Ok(self.store.update_subject(id, input).await?),
            None => Ok(None),
        }
    }

    pub async fn delete_subject(&self, id: &str) -> Result<(), ServiceError> {
        if let Some(id) = parse_id(id) {
            self.store.set_subject_status(id, RecordStatus::Inactive).await?;
        }
        Ok(())
    }

    // Tasks

    pub async fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.list_tasks(filter).await?)
    }

    pub async fn create_task(&self, input: &TaskInput, caller: Uuid) -> Result<Task, ServiceError> {
        let task = Task::create(input, Some(caller))?;
        self.store.insert_task(&task).await?;
        Ok(task)
    }

    pub async fn update_task(&self, id: &str, input: &TaskInput) -> Result<Option<Task>, ServiceError> {
        match parse_id(id) {
            Some(id) => Ok(self.store.update_task(id, input).await?),
            None => Ok(None),
        }
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        if let Some(id) = parse_id(id) {
            self.store.set_task_status(id, RecordStatus::Inactive).await?;
        }
        Ok(())
    }

    // Tests

    pub async fn tests(&self) -> Result<Vec<MockTest>, ServiceError> {
        Ok(self.store.list_tests().await?)
    }

    pub async fn create_test(&self, input: &MockTestInput) -> Result<MockTest, ServiceError> {
        let test = MockTest::create(input)?;
        self.store.insert_test(&test).await?;
        Ok(test)
    }

    pub async fn update_test(&self, id: &str, input: &MockTestInput) -> Result<Option<MockTest>, ServiceError> {
        match parse_id(id) {
            Some(id) => Ok(self.store.update_test(id, input).await?),
            None => Ok(None),
        }
    }

    pub async fn delete_test(&self, id: &str) -> Result<(), ServiceError> {
        if let Some(id) = parse_id(id) {
            self.store.set_test_status(id, RecordStatus::Inactive).await?;
        }
        Ok(())
    }

    // Routines

    pub async fn routines(&self) -> Result<RoutineMap, ServiceError> {
        Ok(RoutineMap::from_routines(self.store.list_routines().await?))
    }

    pub async fn replace_routine(
        &self,
        routine_type: &str,
        schedule: &[ScheduleEntry],
    ) -> Result<Routine, ServiceError> {
        let routine_type: RoutineType = routine_type.parse()?;
        Ok(self.store.upsert_routine(routine_type, schedule).await?)
    }
}
