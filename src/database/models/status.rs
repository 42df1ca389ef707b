use serde::{Deserialize, Serialize};

/// Soft-delete marker shared by every catalog entity. List queries only see `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "record_status", rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn from_active(is_active: bool) -> Self {
        if is_active {
            RecordStatus::Active
        } else {
            RecordStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        self == RecordStatus::Active
    }
}

/// Resolve the status requested by a write body. Clients may send either
/// `"status": "inactive"` or the older `"isActive": false`; `status` wins.
pub fn requested_status(status: Option<RecordStatus>, is_active: Option<bool>) -> Option<RecordStatus> {
    status.or(is_active.map(RecordStatus::from_active))
}
