//! Key/value preference store: therapist letterhead, AI settings and the
//! practitioner's symbolic-interpretation overrides, all as JSON values.

use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::interpretations::Interpretation;
use crate::models::{AiSettings, Therapist, UiSettings};

const THERAPIST_KEY: &str = "therapist";
const AI_SETTINGS_KEY: &str = "ai_settings";
const UI_SETTINGS_KEY: &str = "ui_settings";
const SYMBOLIC_OVERRIDES_KEY: &str = "symbolic_overrides";

/// Get a preference by key. Returns None if not set.
pub fn get_preference(conn: &Connection, key: &str) -> Result<Option<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT value FROM user_preferences WHERE key = ?1")?;
    match stmt.query_row([key], |row| row.get::<_, String>(0)) {
        Ok(val) => Ok(Some(val)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Set a preference (upsert).
pub fn set_preference(conn: &Connection, key: &str, value: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_preferences (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// Delete a preference.
pub fn delete_preference(conn: &Connection, key: &str) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM user_preferences WHERE key = ?1", [key])?;
    Ok(())
}

// ──────────────────────────────────────────────
// Typed accessors
// ──────────────────────────────────────────────

/// Therapist letterhead; defaults apply when never saved.
pub fn get_therapist(conn: &Connection) -> Result<Therapist, DatabaseError> {
    match get_preference(conn, THERAPIST_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Therapist::default()),
    }
}

pub fn set_therapist(conn: &Connection, therapist: &Therapist) -> Result<(), DatabaseError> {
    set_preference(conn, THERAPIST_KEY, &serde_json::to_string(therapist)?)
}

/// AI settings; defaults to the local Ollama endpoint when never saved.
pub fn get_ai_settings(conn: &Connection) -> Result<AiSettings, DatabaseError> {
    match get_preference(conn, AI_SETTINGS_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(AiSettings::default()),
    }
}

pub fn set_ai_settings(conn: &Connection, settings: &AiSettings) -> Result<(), DatabaseError> {
    set_preference(conn, AI_SETTINGS_KEY, &serde_json::to_string(settings)?)
}

/// Display preferences; defaults apply when never saved.
pub fn get_ui_settings(conn: &Connection) -> Result<UiSettings, DatabaseError> {
    match get_preference(conn, UI_SETTINGS_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(UiSettings::default()),
    }
}

pub fn set_ui_settings(conn: &Connection, settings: &UiSettings) -> Result<(), DatabaseError> {
    set_preference(conn, UI_SETTINGS_KEY, &serde_json::to_string(settings)?)
}

/// The practitioner's interpretation overrides, keyed by element label.
pub fn get_symbolic_overrides(
    conn: &Connection,
) -> Result<HashMap<String, Interpretation>, DatabaseError> {
    match get_preference(conn, SYMBOLIC_OVERRIDES_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(HashMap::new()),
    }
}

pub fn set_symbolic_overrides(
    conn: &Connection,
    overrides: &HashMap<String, Interpretation>,
) -> Result<(), DatabaseError> {
    set_preference(
        conn,
        SYMBOLIC_OVERRIDES_KEY,
        &serde_json::to_string(overrides)?,
    )
}
