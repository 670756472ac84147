use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MELD Entry";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dataset name used for export sheet naming and default file names.
pub const DATASET_NAME: &str = "MELD";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "info,meld_entry_lib=debug".to_string()
}

/// Application data directory: ~/MELD/ on all platforms
/// (user-visible next to exported files, matching the clinic workflow).
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MELD")
}

/// Path of the single case database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("meld.db")
}
