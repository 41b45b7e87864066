mod settings;

pub use settings::Settings;

use std::path::PathBuf;

use crate::error::SettingsError;

/// Returns `~/.config/loopcue[-dev]/` based on LOOPCUE_ENV.
///
/// Set LOOPCUE_ENV=dev to use a development settings directory.
///
/// # Errors
/// Returns an error if the settings directory cannot be created.
pub fn data_dir() -> Result<PathBuf, SettingsError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LOOPCUE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("loopcue-dev")
    } else {
        base_dir.join("loopcue")
    };

    std::fs::create_dir_all(&dir).map_err(|source| SettingsError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
