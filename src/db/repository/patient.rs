//! Patient repository.

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, dob, anamnesis, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            patient.id,
            patient.name,
            patient.dob,
            patient.anamnesis,
            patient.created_at,
        ],
    )?;
    Ok(())
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET name = ?2, dob = ?3, anamnesis = ?4 WHERE id = ?1",
        params![patient.id, patient.name, patient.dob, patient.anamnesis],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

pub fn get_patient(conn: &Connection, id: Uuid) -> Result<Patient, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, dob, anamnesis, created_at FROM patients WHERE id = ?1",
    )?;
    stmt.query_row([id], |row| {
        Ok(Patient {
            id: row.get(0)?,
            name: row.get(1)?,
            dob: row.get(2)?,
            anamnesis: row.get(3)?,
            created_at: row.get(4)?,
        })
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        },
        other => DatabaseError::from(other),
    })
}

/// All patients, alphabetical.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, dob, anamnesis, created_at FROM patients ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Patient {
            id: row.get(0)?,
            name: row.get(1)?,
            dob: row.get(2)?,
            anamnesis: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Delete a patient record; sessions cascade.
pub fn delete_patient(conn: &Connection, id: Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
