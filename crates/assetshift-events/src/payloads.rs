//! Event payload types carried from the engine to observers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identifier assigned to each event emitted on the bus.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Typed progress events surfaced by reorganization runs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A commit began for a planned worklist.
    RunStarted {
        /// Identifier for the run.
        run_id: Uuid,
        /// Number of files in the worklist.
        total: usize,
    },
    /// A commit phase changed status.
    PhaseProgress {
        /// Identifier for the run.
        run_id: Uuid,
        /// Phase name (`prepare_paths`, `create_folders`, ...).
        phase: String,
        /// Phase status (`started`, `completed`, `failed`, `skipped`).
        status: String,
    },
    /// A file in the worklist was processed.
    FileProgress {
        /// Identifier for the run.
        run_id: Uuid,
        /// One-based position of the file in the worklist.
        index: usize,
        /// Number of files in the worklist.
        total: usize,
        /// Root-relative path of the file being processed.
        path: String,
    },
    /// The commit finished; per-file failures may still be present in its report.
    RunCompleted {
        /// Identifier for the run.
        run_id: Uuid,
        /// Files moved.
        moved: usize,
        /// Files copied.
        copied: usize,
        /// Files skipped.
        skipped: usize,
        /// Per-file failures recorded.
        failed: usize,
    },
    /// The commit aborted before mutating the filesystem.
    RunFailed {
        /// Identifier for the run.
        run_id: Uuid,
        /// Rendered error chain.
        message: String,
    },
    /// Settings were repaired while loading.
    SettingsWarning {
        /// Human-readable description of the repair.
        message: String,
    },
}

impl Event {
    /// Machine-friendly discriminator for observers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::PhaseProgress { .. } => "phase_progress",
            Self::FileProgress { .. } => "file_progress",
            Self::RunCompleted { .. } => "run_completed",
            Self::RunFailed { .. } => "run_failed",
            Self::SettingsWarning { .. } => "settings_warning",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned by the bus.
    pub id: EventId,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event payload.
    pub event: Event,
}
