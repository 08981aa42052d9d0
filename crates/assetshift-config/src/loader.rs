//! Settings persistence backed by a JSON document on disk.
//!
//! # Design
//! - Loading always runs the same pipeline: parse, reconcile, validate.
//! - A stale action table is repaired and reported, never treated as fatal.
//! - Missing documents are created from defaults by `load_or_init`.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigWarning, OrganizerSettings};
use crate::validate::validate_settings;

/// Default settings file name, resolved relative to the project directory.
pub const SETTINGS_FILE_NAME: &str = "assetshift.settings.json";

/// Settings snapshot plus any warnings raised while loading it.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// Reconciled and validated settings.
    pub settings: OrganizerSettings,
    /// Non-fatal findings the caller should surface.
    pub warnings: Vec<ConfigWarning>,
}

/// Parse, reconcile, and validate a settings document.
///
/// # Errors
///
/// Returns an error if the document is not valid JSON or fails validation.
pub fn parse_settings(raw: &str, origin: &Path) -> ConfigResult<LoadedSettings> {
    let mut settings: OrganizerSettings = serde_json::from_str(raw)
        .map_err(|source| ConfigError::json("settings.parse", origin, source))?;

    let mut warnings = Vec::new();
    if let Some(warning) = settings.reconcile_action_table() {
        warn!(path = %origin.display(), detail = %warning.message(), "settings action table rebuilt");
        warnings.push(warning);
    }

    validate_settings(&settings)?;
    Ok(LoadedSettings { settings, warnings })
}

/// Load settings from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_settings(path: &Path) -> ConfigResult<LoadedSettings> {
    let raw =
        fs::read_to_string(path).map_err(|source| ConfigError::io("settings.read", path, source))?;
    parse_settings(&raw, path)
}

/// Load settings from `path`, writing the defaults first when the file is absent.
///
/// # Errors
///
/// Returns an error if the defaults cannot be written or the existing file is invalid.
pub fn load_or_init(path: &Path) -> ConfigResult<LoadedSettings> {
    if path.exists() {
        return load_settings(path);
    }

    let settings = OrganizerSettings::defaults();
    save_settings(path, &settings)?;
    info!(path = %path.display(), "created default settings");
    Ok(LoadedSettings {
        settings,
        warnings: Vec::new(),
    })
}

/// Persist `settings` to `path` as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn save_settings(path: &Path, settings: &OrganizerSettings) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| ConfigError::io("settings.create_dir", parent, source))?;
    }
    let rendered = serde_json::to_string_pretty(settings)
        .map_err(|source| ConfigError::json("settings.serialize", path, source))?;
    fs::write(path, rendered).map_err(|source| ConfigError::io("settings.write", path, source))
}
