//! Session report export: PDF rendering and file placement.

pub mod pdf;

pub use pdf::generate_session_pdf;

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Report file name: `seance_<patient>_<jj-mm-aaaa>.pdf` with the patient
/// name reduced to lowercase ASCII alphanumerics.
pub fn session_report_filename(patient_name: &str, date: &DateTime<Utc>) -> String {
    let safe_name = safe_file_name(patient_name);
    format!("seance_{}_{}.pdf", safe_name, date.format("%d-%m-%Y"))
}

fn safe_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if safe.chars().all(|c| c == '_') {
        "document".to_string()
    } else {
        safe
    }
}

/// Write PDF bytes into the exports directory, creating it if needed.
pub fn export_pdf_to_dir(
    pdf_bytes: &[u8],
    filename: &str,
    exports_dir: &Path,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), "session report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_sanitizes_the_patient_name() {
        let date = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        assert_eq!(
            session_report_filename("Marie Dupont", &date),
            "seance_marie_dupont_01-02-2024.pdf"
        );
    }

    #[test]
    fn accented_characters_become_underscores() {
        let date = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        assert_eq!(
            session_report_filename("Héloïse N°1", &date),
            "seance_h_lo_se_n_1_01-02-2024.pdf"
        );
    }

    #[test]
    fn empty_name_falls_back_to_document() {
        let date = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        assert_eq!(
            session_report_filename("", &date),
            "seance_document_01-02-2024.pdf"
        );
    }

    #[test]
    fn export_writes_into_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = export_pdf_to_dir(b"%PDF-stub", "seance_test.pdf", &target).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-stub");
    }
}
