use std::sync::Arc;
use uuid::Uuid;

use crate::database::models::{ProgressData, ProgressPatch};
use crate::database::Store;

use super::ServiceError;

/// Self-scoped access to a user's progress document
pub struct ProgressService {
    store: Arc<dyn Store>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// First read for a user materializes an empty record.
    pub async fn load(&self, user_id: Uuid) -> Result<ProgressData, ServiceError> {
        Ok(self.store.get_or_create_progress(user_id).await?.data)
    }

    /// Read-modify-write of the fields present in `patch`. Concurrent saves
    /// for the same user are last-writer-wins.
    pub async fn save(&self, user_id: Uuid, patch: ProgressPatch) -> Result<(), ServiceError> {
        let mut progress = self.store.get_or_create_progress(user_id).await?;
        patch.apply_to(&mut progress);
        self.store.save_progress(&progress).await?;
        Ok(())
    }
}
