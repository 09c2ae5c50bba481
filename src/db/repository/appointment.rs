//! Appointment repository (the practice's local agenda).

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row as SqlRow};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Appointment;

pub fn add_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_name, date, time, duration_minutes, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.id,
            appt.patient_name,
            appt.date,
            appt.time,
            appt.duration_minutes,
            appt.notes,
        ],
    )?;
    Ok(())
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments
         SET patient_name = ?2, date = ?3, time = ?4, duration_minutes = ?5, notes = ?6
         WHERE id = ?1",
        params![
            appt.id,
            appt.patient_name,
            appt.date,
            appt.time,
            appt.duration_minutes,
            appt.notes,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM appointments WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// All appointments, chronological.
pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, date, time, duration_minutes, notes
         FROM appointments ORDER BY date, time",
    )?;
    let rows = stmt.query_map([], read_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Appointments on or after a date, chronological.
pub fn upcoming_appointments(
    conn: &Connection,
    from: NaiveDate,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, date, time, duration_minutes, notes
         FROM appointments WHERE date >= ?1 ORDER BY date, time",
    )?;
    let rows = stmt.query_map([from], read_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn read_row(row: &SqlRow<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        duration_minutes: row.get(4)?,
        notes: row.get(5)?,
    })
}
