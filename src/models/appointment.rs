use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A locally stored appointment. Remote calendar synchronization is handled
/// outside this crate; these records are the practice's own agenda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub date: NaiveDate,
    /// Start time, "HH:MM", empty when unscheduled within the day.
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

fn default_duration() -> u32 {
    60
}

impl Appointment {
    pub fn new(patient_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_name: patient_name.into(),
            date,
            time: String::new(),
            duration_minutes: default_duration(),
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_appointment_defaults_to_one_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let a = Appointment::new("Marie Dupont", date);
        assert_eq!(a.duration_minutes, 60);
        assert!(a.time.is_empty());
    }

    #[test]
    fn appointment_round_trips_through_json() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let mut a = Appointment::new("Jean Martin", date);
        a.time = "14:30".into();
        let json = serde_json::to_string(&a).unwrap();
        let back: Appointment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
