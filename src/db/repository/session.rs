//! Session repository. Grids are stored as a JSON column in the legacy wire
//! shape, so files produced by earlier versions import directly.

use rusqlite::{params, Connection, Row as SqlRow};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::grid::GridBundle;
use crate::models::Session;

/// Insert or update a session. Saving an already saved session overwrites it
/// in place (sessions are re-edited continuously while open).
pub fn save_session(conn: &Connection, session: &Session) -> Result<(), DatabaseError> {
    let grids = serde_json::to_string(&session.grids)?;
    conn.execute(
        "INSERT INTO sessions (id, patient_id, date, grids, anamnesis, notes, comments, analysis)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
             date = ?3, grids = ?4, anamnesis = ?5, notes = ?6, comments = ?7, analysis = ?8",
        params![
            session.id,
            session.patient_id,
            session.date,
            grids,
            session.anamnesis,
            session.notes,
            session.comments,
            session.analysis,
        ],
    )?;
    Ok(())
}

pub fn get_session(conn: &Connection, id: Uuid) -> Result<Session, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, date, grids, anamnesis, notes, comments, analysis
         FROM sessions WHERE id = ?1",
    )?;
    let row = stmt
        .query_row([id], read_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Session".into(),
                id: id.to_string(),
            },
            other => DatabaseError::from(other),
        })?;
    finish_row(row)
}

/// All of a patient's sessions, most recent first.
pub fn list_sessions(conn: &Connection, patient_id: Uuid) -> Result<Vec<Session>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, date, grids, anamnesis, notes, comments, analysis
         FROM sessions WHERE patient_id = ?1 ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([patient_id], read_row)?;
    rows.map(|r| finish_row(r?))
        .collect::<Result<Vec<_>, _>>()
}

/// The `limit` most recent sessions (evolution analysis input).
pub fn recent_sessions(
    conn: &Connection,
    patient_id: Uuid,
    limit: usize,
) -> Result<Vec<Session>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, date, grids, anamnesis, notes, comments, analysis
         FROM sessions WHERE patient_id = ?1 ORDER BY date DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![patient_id, limit as i64], read_row)?;
    rows.map(|r| finish_row(r?))
        .collect::<Result<Vec<_>, _>>()
}

pub fn delete_session(conn: &Connection, id: Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Session".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Intermediate row with the grids column still serialized.
struct RawSession {
    session: Session,
    grids_json: String,
}

fn read_row(row: &SqlRow<'_>) -> rusqlite::Result<RawSession> {
    Ok(RawSession {
        session: Session {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            date: row.get(2)?,
            grids: GridBundle::empty(),
            anamnesis: row.get(4)?,
            notes: row.get(5)?,
            comments: row.get(6)?,
            analysis: row.get(7)?,
        },
        grids_json: row.get(3)?,
    })
}

fn finish_row(raw: RawSession) -> Result<Session, DatabaseError> {
    let mut session = raw.session;
    session.grids = serde_json::from_str(&raw.grids_json)?;
    Ok(session)
}
