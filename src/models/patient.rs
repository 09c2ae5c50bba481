use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient record. Sessions are stored separately, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// Date of birth, when known.
    pub dob: Option<NaiveDate>,
    /// General anamnesis, carried across sessions.
    pub anamnesis: String,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            dob: None,
            anamnesis: String::new(),
            created_at: Utc::now(),
        }
    }
}
