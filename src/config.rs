use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Somanote";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Ollama instance for AI analysis.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default text-generation model.
pub const DEFAULT_MODEL: &str = "llama3";
/// Analysis requests can take minutes on CPU-only machines.
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 300;

pub fn default_log_filter() -> String {
    "somanote=info".to_string()
}

/// Get the application data directory
/// ~/Somanote/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Somanote")
}

/// SQLite database path.
pub fn database_path() -> PathBuf {
    app_data_dir().join("somanote.db")
}

/// Directory where PDF session reports are written.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Somanote"));
    }

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("somanote.db"));
    }

    #[test]
    fn exports_under_app_data() {
        let exports = exports_dir();
        assert!(exports.starts_with(app_data_dir()));
        assert!(exports.ends_with("exports"));
    }

    #[test]
    fn default_model_is_llama3() {
        assert_eq!(DEFAULT_MODEL, "llama3");
    }
}
