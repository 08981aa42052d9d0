//! Built-in rule tables and option defaults.
//!
//! # Design
//! - Centralize the default tables so a fresh settings file and a reset agree.
//! - Action slots line up with classification order; `Other` stays last.

use crate::model::{
    Classification, FileAction, FolderRule, OTHER_CLASSIFICATION, OrganizerSettings, SortKey,
    TypeHierarchy,
};

/// Default suffix appended to the stem of copied files.
pub const DEFAULT_COPY_SUFFIX: &str = "_copy";
/// Default suffix appended to the destination root.
pub const DEFAULT_FOLDER_SUFFIX: &str = "_Assets";
/// Default project root name.
pub const DEFAULT_PROJECT_ROOT: &str = "Assets";

const MODEL_EXTENSIONS: &[&str] = &[".fbx", ".obj", ".dae", ".3ds", ".dxf", ".blend"];

/// `(name, default action, type tags, extensions)` in classification order.
type ClassificationSeed = (
    &'static str,
    FileAction,
    &'static [&'static str],
    &'static [&'static str],
);

const CLASSIFICATION_SEEDS: &[ClassificationSeed] = &[
    (
        "Animations",
        FileAction::Copy,
        &["AnimationClip", "BlendTree"],
        &[],
    ),
    (
        "Controllers",
        FileAction::Copy,
        &["AnimatorController", "AnimatorOverrideController"],
        &[],
    ),
    (
        "Textures",
        FileAction::Copy,
        &["Texture", "Texture2D", "RenderTexture", "Cubemap"],
        &[],
    ),
    ("Materials", FileAction::Copy, &["Material"], &[]),
    ("Models", FileAction::Copy, &["Mesh"], MODEL_EXTENSIONS),
    ("Prefabs", FileAction::Copy, &["GameObject"], &[".prefab"]),
    ("Audio", FileAction::Copy, &["AudioClip"], &[]),
    ("Masks", FileAction::Copy, &["AvatarMask"], &[]),
    ("Scenes", FileAction::Copy, &["SceneAsset"], &[".unity"]),
    ("Presets", FileAction::Skip, &["Preset"], &[]),
    (
        "VRC",
        FileAction::Copy,
        &["VRCExpressionParameters", "VRCExpressionsMenu"],
        &[],
    ),
    ("Shaders", FileAction::Skip, &["Shader", "ComputeShader"], &[]),
    ("Scripts", FileAction::Skip, &["MonoScript"], &[".dll", ".cs"]),
    ("Fonts", FileAction::Copy, &["Font"], &[]),
    (
        "Physics",
        FileAction::Copy,
        &["PhysicMaterial", "PhysicsMaterial2D"],
        &[],
    ),
    ("Lighting", FileAction::Copy, &["LightingDataAsset"], &[]),
    (
        OTHER_CLASSIFICATION,
        FileAction::Copy,
        &["ScriptableObject"],
        &[],
    ),
];

const FOLDER_RULE_SEEDS: &[(&str, FileAction)] = &[
    ("__Generated", FileAction::Copy),
    ("VRCSDK", FileAction::Skip),
    ("Packages", FileAction::Skip),
    ("Plugins", FileAction::Skip),
    ("Editor", FileAction::Skip),
];

const TYPE_HIERARCHY_SEEDS: &[(&str, &str)] = &[
    ("Texture2D", "Texture"),
    ("RenderTexture", "Texture"),
    ("Cubemap", "Texture"),
    ("AnimationClip", "Motion"),
    ("BlendTree", "Motion"),
    ("AnimatorController", "RuntimeAnimatorController"),
    ("AnimatorOverrideController", "RuntimeAnimatorController"),
    ("VRCExpressionParameters", "ScriptableObject"),
    ("VRCExpressionsMenu", "ScriptableObject"),
    ("LightingDataAsset", "ScriptableObject"),
    ("MonoScript", "TextAsset"),
];

const REFERENCE_EXTENSIONS: &[&str] = &[".asset", ".prefab", ".unity", ".mat"];

const IGNORE_PATTERNS: &[&str] = &["**/.DS_Store", "**/Thumbs.db"];

impl OrganizerSettings {
    /// Default settings document written when no settings file exists.
    #[must_use]
    pub fn defaults() -> Self {
        let classifications = CLASSIFICATION_SEEDS
            .iter()
            .enumerate()
            .map(|(index, (name, _, types, extensions))| {
                Classification::new(name, index, types, extensions)
            })
            .collect();
        let type_actions = CLASSIFICATION_SEEDS
            .iter()
            .map(|(_, action, _, _)| *action)
            .collect();

        Self {
            folder_rules: FOLDER_RULE_SEEDS
                .iter()
                .map(|(token, action)| FolderRule::new(token, *action))
                .collect(),
            classifications,
            type_actions,
            type_hierarchy: TypeHierarchy::from_pairs(TYPE_HIERARCHY_SEEDS),
            sort_key: SortKey::Path,
            delete_empty_folders: true,
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
            folder_suffix: DEFAULT_FOLDER_SUFFIX.to_string(),
            project_root: DEFAULT_PROJECT_ROOT.to_string(),
            reference_extensions: REFERENCE_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignore_patterns: IGNORE_PATTERNS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Restore every field to its default value.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::defaults();
    }
}
