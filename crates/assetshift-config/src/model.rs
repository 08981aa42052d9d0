//! Typed organizer settings and rule tables.
//!
//! # Design
//! - Pure data carriers shared by the planner, the engine, and the CLI.
//! - Keeps persistence (`loader.rs`) and validation (`validate.rs`) out of the models.
//! - Type matching is data-defined: classifications list closed tag sets and the
//!   `TypeHierarchy` table answers "is-a" questions without any reflection.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the terminal catch-all classification.
pub const OTHER_CLASSIFICATION: &str = "Other";

/// Action applied to a file during a reorganization run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// Leave the file where it is.
    #[default]
    Skip,
    /// Relocate the file, keeping its stable identifier.
    Move,
    /// Duplicate the file under a fresh stable identifier.
    Copy,
}

impl FileAction {
    /// Render the action as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }
}

impl FromStr for FileAction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "move" => Ok(Self::Move),
            "copy" => Ok(Self::Copy),
            _ => Err(ConfigError::InvalidField {
                section: "actions",
                field: "action".to_string(),
                value: Some(s.to_string()),
                reason: "unknown_action",
            }),
        }
    }
}

/// Ordering applied to a planned worklist.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Full root-relative path, lexicographic.
    #[default]
    Path,
    /// Bare file name without its extension, lexicographic.
    FileName,
    /// Classification name, lexicographic.
    Category,
}

/// Named bucket of file kinds sharing a destination folder and an action slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    /// Display name; also the destination folder name in category layouts.
    pub name: String,
    /// Type tags matched exactly or through the type hierarchy.
    #[serde(default)]
    pub types: Vec<String>,
    /// Path suffixes matched case-insensitively (for example `.fbx`).
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Index into the parallel action table.
    pub action_index: usize,
}

impl Classification {
    /// Build a classification from static tag and extension lists.
    #[must_use]
    pub fn new(name: &str, action_index: usize, types: &[&str], extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            types: types.iter().map(ToString::to_string).collect(),
            extensions: extensions.iter().map(ToString::to_string).collect(),
            action_index,
        }
    }

    /// Whether this is the terminal catch-all bucket.
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.name == OTHER_CLASSIFICATION
    }
}

/// Folder-name override forcing an action on every file beneath a matching segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderRule {
    /// Folder name compared against each path segment.
    pub token: String,
    /// Disabled rules are ignored during planning.
    #[serde(default = "enabled_by_default")]
    pub active: bool,
    /// Action forced on matching files.
    #[serde(default)]
    pub action: FileAction,
}

impl FolderRule {
    /// Construct an active rule for `token`.
    #[must_use]
    pub fn new(token: &str, action: FileAction) -> Self {
        Self {
            token: token.to_string(),
            active: true,
            action,
        }
    }

    /// Whether the rule is active and `path` has a segment equal to the token.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.active && path.split('/').any(|segment| segment == self.token)
    }
}

const fn enabled_by_default() -> bool {
    true
}

/// Explicit child-to-parent type table used for subtype matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TypeHierarchy(BTreeMap<String, String>);

impl TypeHierarchy {
    /// Build a hierarchy from `(child, parent)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(child, parent)| ((*child).to_string(), (*parent).to_string()))
                .collect(),
        )
    }

    /// Whether `tag` equals `ancestor` or descends from it.
    ///
    /// The walk is bounded by the table size so a cyclic table cannot loop forever.
    #[must_use]
    pub fn is_a(&self, tag: &str, ancestor: &str) -> bool {
        let mut current = tag;
        for _ in 0..=self.0.len() {
            if current == ancestor {
                return true;
            }
            match self.0.get(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Parent of `tag`, if declared.
    #[must_use]
    pub fn parent_of(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    /// Iterate `(child, parent)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(child, parent)| (child.as_str(), parent.as_str()))
    }
}

/// Non-fatal findings surfaced while loading settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    /// The persisted action table did not match the classification count and was rebuilt.
    ActionTableRebuilt {
        /// Number of classifications currently defined.
        expected: usize,
        /// Number of actions found in the persisted table.
        found: usize,
    },
}

impl ConfigWarning {
    /// Human-readable summary for logs and CLI output.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::ActionTableRebuilt { expected, found } => format!(
                "action table had {found} entries for {expected} classifications; rebuilt with defaults"
            ),
        }
    }
}

/// Complete organizer configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrganizerSettings {
    /// Folder overrides, evaluated in order after classification.
    pub folder_rules: Vec<FolderRule>,
    /// Ordered classification table; the last entry must be `Other`.
    pub classifications: Vec<Classification>,
    /// Action table indexed by `Classification::action_index`.
    pub type_actions: Vec<FileAction>,
    /// Child-to-parent type relation used for subtype matching.
    pub type_hierarchy: TypeHierarchy,
    /// Ordering applied to planned worklists.
    pub sort_key: SortKey,
    /// Remove folders left empty by a run.
    pub delete_empty_folders: bool,
    /// Suffix appended to the stem of copied files.
    pub copy_suffix: String,
    /// Suffix appended to the destination root's final segment.
    pub folder_suffix: String,
    /// Name of the project root every destination must live under.
    pub project_root: String,
    /// Extensions of text formats whose cross-references get rewritten.
    pub reference_extensions: Vec<String>,
    /// Glob patterns excluded from folder listings.
    pub ignore_patterns: Vec<String>,
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl OrganizerSettings {
    /// Action configured for `classification`; out-of-range slots read as `Skip`.
    #[must_use]
    pub fn action_for(&self, classification: &Classification) -> FileAction {
        self.type_actions
            .get(classification.action_index)
            .copied()
            .unwrap_or_default()
    }

    /// The terminal catch-all classification, when the table is well formed.
    #[must_use]
    pub fn other(&self) -> Option<&Classification> {
        self.classifications.last().filter(|class| class.is_other())
    }

    /// Look up a classification by name.
    #[must_use]
    pub fn classification(&self, name: &str) -> Option<&Classification> {
        self.classifications.iter().find(|class| class.name == name)
    }

    /// Bring the action table back in line with the classification count.
    ///
    /// Existing slots are preserved; missing slots default to `Skip`. Returns a
    /// warning when the table had to be rebuilt.
    pub fn reconcile_action_table(&mut self) -> Option<ConfigWarning> {
        let expected = self.classifications.len();
        let found = self.type_actions.len();
        if expected == found {
            return None;
        }
        self.type_actions.resize(expected, FileAction::Skip);
        Some(ConfigWarning::ActionTableRebuilt { expected, found })
    }

    /// Replace every `from` action with `to` in the folder rules and action table.
    ///
    /// Returns the number of entries changed.
    pub fn retarget_actions(&mut self, from: FileAction, to: FileAction) -> usize {
        let mut changed = 0usize;
        for rule in &mut self.folder_rules {
            if rule.action == from {
                rule.action = to;
                changed += 1;
            }
        }
        for action in &mut self.type_actions {
            if *action == from {
                *action = to;
                changed += 1;
            }
        }
        changed
    }
}
