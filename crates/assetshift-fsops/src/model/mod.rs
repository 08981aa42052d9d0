//! Domain models for reorganization runs.
//!
//! # Design
//! - Keep plan and report types serializable so the CLI can render them.
//! - Per-run mutable state lives in `RunContext`, created by the engine for each commit.

use std::collections::{BTreeSet, HashSet};

use assetshift_config::{FileAction, OrganizerSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::paths;
use crate::rewrite::IdentifierRemap;

/// One discovered file and its planned action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedFile {
    /// Root-relative, forward-slash path.
    pub path: String,
    /// Identifier other files use to reference this one.
    pub stable_id: String,
    /// Declared or inferred type tag.
    pub type_tag: Option<String>,
    /// Classification name, assigned during planning.
    pub category: Option<String>,
    /// Planned action.
    pub action: FileAction,
}

impl TrackedFile {
    /// Construct an unplanned file.
    #[must_use]
    pub fn new(path: impl Into<String>, stable_id: impl Into<String>, type_tag: Option<String>) -> Self {
        Self {
            path: path.into(),
            stable_id: stable_id.into(),
            type_tag,
            category: None,
            action: FileAction::Skip,
        }
    }

    /// File name including its extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        paths::file_name(&self.path)
    }

    /// File name without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        paths::split_extension(self.file_name()).0
    }

    /// Extension including the leading dot, or empty.
    #[must_use]
    pub fn extension(&self) -> &str {
        paths::split_extension(self.file_name()).1
    }

    /// Containing folder.
    #[must_use]
    pub fn folder(&self) -> &str {
        paths::parent(&self.path)
    }
}

/// Output of dependency resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    /// Each discovered file exactly once, in discovery order.
    pub files: Vec<TrackedFile>,
    /// Folder that relative layouts are computed against.
    pub base_path: String,
}

/// Ordered, planned files for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Worklist {
    files: Vec<TrackedFile>,
}

impl Worklist {
    /// Wrap already-ordered files.
    #[must_use]
    pub const fn new(files: Vec<TrackedFile>) -> Self {
        Self { files }
    }

    /// Planned files in order.
    #[must_use]
    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    /// Number of planned files.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was planned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Override the action of the file at `path`; returns whether it was found.
    pub fn set_action(&mut self, path: &str, action: FileAction) -> bool {
        match self.files.iter_mut().find(|file| file.path == path) {
            Some(file) => {
                file.action = action;
                true
            }
            None => false,
        }
    }

    /// Replace every `from` action with `to`; returns the number of files changed.
    pub fn retarget(&mut self, from: FileAction, to: FileAction) -> usize {
        let mut changed = 0usize;
        for file in self.files.iter_mut().filter(|file| file.action == from) {
            file.action = to;
            changed += 1;
        }
        changed
    }

    /// Count files planned with `action`.
    #[must_use]
    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|file| file.action == action).count()
    }

    pub(crate) fn into_files(self) -> Vec<TrackedFile> {
        self.files
    }
}

/// Result of planning an entry point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// Ordered worklist.
    pub worklist: Worklist,
    /// Folder that relative layouts are computed against.
    pub base_path: String,
}

/// Destination layout strategy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// `destination/<classification>/<file>`.
    #[default]
    ByCategory,
    /// `destination/<dir relative to base>/<file>`.
    ByStructure,
}

impl LayoutMode {
    /// Render the mode as its snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByCategory => "by_category",
            Self::ByStructure => "by_structure",
        }
    }
}

/// Options recognized by a commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitOptions {
    /// Appended to the stem of copied files.
    pub copy_suffix: String,
    /// Appended to the destination root's final segment.
    pub folder_suffix: String,
    /// Remove folders left empty by the run.
    pub delete_empty_folders: bool,
    /// Project root every destination must live under.
    pub project_root: String,
    /// Extensions whose contents carry identifier references.
    pub reference_extensions: Vec<String>,
}

impl CommitOptions {
    /// Snapshot the commit-relevant fields of `settings`.
    #[must_use]
    pub fn from_settings(settings: &OrganizerSettings) -> Self {
        Self {
            copy_suffix: settings.copy_suffix.clone(),
            folder_suffix: settings.folder_suffix.clone(),
            delete_empty_folders: settings.delete_empty_folders,
            project_root: settings.project_root.clone(),
            reference_extensions: settings.reference_extensions.clone(),
        }
    }

    /// Whether `path` is one of the reference-bearing text formats.
    #[must_use]
    pub fn is_reference_bearing(&self, path: &str) -> bool {
        self.reference_extensions
            .iter()
            .any(|ext| paths::has_extension(path, ext))
    }
}

/// Where a planned file would land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedTransfer {
    /// Current path.
    pub source: String,
    /// Destination path, or `None` for skipped files.
    pub destination: Option<String>,
    /// Planned action.
    pub action: FileAction,
    /// Classification name.
    pub category: Option<String>,
}

/// A completed move or copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferRecord {
    /// Original path.
    pub source: String,
    /// Final path after uniquification.
    pub destination: String,
    /// Action performed.
    pub action: FileAction,
}

/// Phase in which a per-file failure occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A move or copy failed; the file was left in place.
    Transfer,
    /// A copy was created but its references could not be rewritten.
    Rewrite,
}

/// Per-file failure recorded without aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileFailure {
    /// Path the failure relates to.
    pub path: String,
    /// Phase of the failure.
    pub kind: FailureKind,
    /// Rendered error chain.
    pub message: String,
}

/// Summary of a committed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    /// Identifier of the run.
    pub run_id: Uuid,
    /// Final destination root, once prepared.
    pub destination_root: Option<String>,
    /// Files moved.
    pub moved: usize,
    /// Files copied.
    pub copied: usize,
    /// Files skipped (planned Skip, or already at their destination).
    pub skipped: usize,
    /// Completed transfers in worklist order.
    pub transfers: Vec<TransferRecord>,
    /// Copies whose identifiers were rewritten.
    pub rewritten: Vec<String>,
    /// Per-file failures.
    pub failures: Vec<FileFailure>,
    /// Folders removed by cleanup, deepest first.
    pub deleted_folders: Vec<String>,
    /// Run-level problems that did not stop the run, such as a failed index refresh.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Commit start.
    pub started_at: DateTime<Utc>,
    /// Commit end.
    pub finished_at: Option<DateTime<Utc>>,
}

impl Report {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            destination_root: None,
            moved: 0,
            copied: 0,
            skipped: 0,
            transfers: Vec::new(),
            rewritten: Vec::new(),
            failures: Vec::new(),
            deleted_folders: Vec::new(),
            warnings: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Number of recorded per-file failures.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Final destination of `source`, if it was transferred.
    #[must_use]
    pub fn destination_of(&self, source: &str) -> Option<&str> {
        self.transfers
            .iter()
            .find(|record| record.source == source)
            .map(|record| record.destination.as_str())
    }
}

/// Explicit per-run state threaded through every commit phase.
#[derive(Debug)]
pub struct RunContext {
    /// Identifier of the run.
    pub run_id: Uuid,
    /// Worklist owned by the run.
    pub files: Vec<TrackedFile>,
    /// Destination folder per worklist entry; `None` for skipped files.
    pub folders: Vec<Option<String>>,
    /// Folders this run created.
    pub created_folders: BTreeSet<String>,
    /// Source folders vacated by moves.
    pub vacated_folders: BTreeSet<String>,
    /// Destination paths already taken during the run.
    pub claimed: HashSet<String>,
    /// Old to new identifiers for copies made so far.
    pub remap: IdentifierRemap,
    /// Copies created this run.
    pub new_copies: Vec<String>,
    /// Report accumulated as phases complete.
    pub report: Report,
}

impl RunContext {
    /// Take ownership of `worklist` for a new run.
    #[must_use]
    pub fn new(run_id: Uuid, worklist: Worklist) -> Self {
        let files = worklist.into_files();
        let folders = vec![None; files.len()];
        Self {
            run_id,
            files,
            folders,
            created_folders: BTreeSet::new(),
            vacated_folders: BTreeSet::new(),
            claimed: HashSet::new(),
            remap: IdentifierRemap::default(),
            new_copies: Vec::new(),
            report: Report::new(run_id),
        }
    }

    /// Finish the run, consuming its state.
    #[must_use]
    pub fn into_report(mut self) -> Report {
        self.report.finished_at = Some(Utc::now());
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, action: FileAction) -> TrackedFile {
        TrackedFile {
            action,
            ..TrackedFile::new(path, "id", None)
        }
    }

    #[test]
    fn tracked_file_name_parts() {
        let tracked = TrackedFile::new("Assets/Foo/a.mat", "0", None);
        assert_eq!(tracked.file_name(), "a.mat");
        assert_eq!(tracked.stem(), "a");
        assert_eq!(tracked.extension(), ".mat");
        assert_eq!(tracked.folder(), "Assets/Foo");
    }

    #[test]
    fn worklist_retarget_counts_changes() {
        let mut worklist = Worklist::new(vec![
            file("Assets/a.mat", FileAction::Move),
            file("Assets/b.mat", FileAction::Skip),
            file("Assets/c.mat", FileAction::Move),
        ]);
        assert_eq!(worklist.retarget(FileAction::Move, FileAction::Copy), 2);
        assert_eq!(worklist.count(FileAction::Copy), 2);
        assert_eq!(worklist.count(FileAction::Move), 0);
        assert!(worklist.set_action("Assets/b.mat", FileAction::Move));
        assert!(!worklist.set_action("Assets/missing.mat", FileAction::Move));
    }

    #[test]
    fn reference_bearing_matches_case_insensitively() {
        let options = CommitOptions::from_settings(&OrganizerSettings::defaults());
        assert!(options.is_reference_bearing("Assets/a.MAT"));
        assert!(options.is_reference_bearing("Assets/scene.unity"));
        assert!(!options.is_reference_bearing("Assets/b.png"));
    }

    #[test]
    fn run_context_sizes_folder_slots() {
        let worklist = Worklist::new(vec![file("Assets/a.mat", FileAction::Copy)]);
        let ctx = RunContext::new(Uuid::nil(), worklist);
        assert_eq!(ctx.folders.len(), 1);
        let report = ctx.into_report();
        assert!(report.finished_at.is_some());
        assert_eq!(report.failed(), 0);
    }
}
