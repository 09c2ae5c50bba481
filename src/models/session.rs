use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grid::GridBundle;

/// One treatment session: the six observation grids plus free-text fields.
///
/// Reopening a historical session and re-editing it produces a new mutation
/// stream against the same `id`; persistence is an upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub grids: GridBundle,
    /// Session-scoped anamnesis ("motif de consultation").
    #[serde(default)]
    pub anamnesis: String,
    /// Snapshot of the patient's general anamnesis at save time.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub comments: String,
    /// Stored AI analysis, if one was generated for this session.
    #[serde(default)]
    pub analysis: Option<String>,
}

impl Session {
    /// Start a new empty session for a patient.
    pub fn new(patient_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            date: Utc::now(),
            grids: GridBundle::empty(),
            anamnesis: String::new(),
            notes: None,
            comments: String::new(),
            analysis: None,
        }
    }
}
