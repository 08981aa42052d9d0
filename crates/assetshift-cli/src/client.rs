//! Shared command context, error types, and settings/store helpers.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use anyhow::anyhow;
use assetshift_config::{
    ConfigError, LoadedSettings, OrganizerSettings, SETTINGS_FILE_NAME, load_or_init,
};
use assetshift_events::{Event, EventBus};
use assetshift_fsops::{LocalAssetStore, ReorgError, ReorgService};
use assetshift_telemetry::Metrics;
use tracing::warn;

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ReorgError> for CliError {
    fn from(err: ReorgError) -> Self {
        match &err {
            ReorgError::EntryNotFound { path } => Self::validation(format!("entry not found: {path}")),
            ReorgError::DestinationInvalid { reason, value } => Self::validation(format!(
                "invalid destination '{}': {reason}",
                value.as_deref().unwrap_or_default()
            )),
            ReorgError::InvalidInput {
                field,
                reason,
                value,
            } => Self::validation(format!(
                "invalid {field} '{}': {reason}",
                value.as_deref().unwrap_or_default()
            )),
            _ => Self::failure(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::InvalidField {
                section,
                field,
                value,
                reason,
            } => Self::validation(format!(
                "invalid settings {section}.{field} '{}': {reason}",
                value.as_deref().unwrap_or_default()
            )),
            _ => Self::failure(err),
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) project: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) output: OutputFormat,
    pub(crate) events: EventBus,
    pub(crate) metrics: Metrics,
    pub(crate) service: ReorgService,
}

impl AppContext {
    pub(crate) fn new(
        project: PathBuf,
        settings: Option<PathBuf>,
        output: OutputFormat,
    ) -> CliResult<Self> {
        if !project.is_dir() {
            return Err(CliError::validation(format!(
                "project directory {} does not exist",
                project.display()
            )));
        }
        let settings_path = settings.unwrap_or_else(|| project.join(SETTINGS_FILE_NAME));
        let events = EventBus::new();
        let metrics = Metrics::new()
            .map_err(|err| CliError::failure(anyhow!("failed to register metrics: {err}")))?;
        let service = ReorgService::new(events.clone(), metrics.clone());
        Ok(Self {
            project,
            settings_path,
            output,
            events,
            metrics,
            service,
        })
    }

    /// Load (or create) the settings document, surfacing load warnings.
    pub(crate) fn load_settings(&self) -> CliResult<OrganizerSettings> {
        let LoadedSettings { settings, warnings } = load_or_init(&self.settings_path)?;
        for warning in warnings {
            let message = warning.message();
            warn!(path = %self.settings_path.display(), detail = %message, "settings warning");
            eprintln!("warning: {message}");
            self.events.publish(Event::SettingsWarning { message });
        }
        Ok(settings)
    }

    /// Open the project as an asset store using the settings' reference extensions.
    pub(crate) fn open_store(&self, settings: &OrganizerSettings) -> CliResult<LocalAssetStore> {
        Ok(LocalAssetStore::open(
            &self.project,
            &settings.reference_extensions,
        )?)
    }
}
