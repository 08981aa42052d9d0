//! Destination path computation shared by commits and previews.

use std::collections::HashSet;

use assetshift_config::{FileAction, OTHER_CLASSIFICATION};

use crate::error::{ReorgError, ReorgResult};
use crate::model::{LayoutMode, TrackedFile};
use crate::paths;
use crate::store::AssetStore;

/// Root `raw` under the project root and append `folder_suffix` once.
///
/// # Errors
///
/// Returns `DestinationInvalid` when the destination is empty, absolute,
/// climbs out with `..`, or names the project root itself.
pub fn destination_root(raw: &str, project_root: &str, folder_suffix: &str) -> ReorgResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReorgError::destination("empty", raw));
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') || trimmed.contains(':') {
        return Err(ReorgError::destination("absolute_path", raw));
    }

    let normalized = paths::normalize(trimmed);
    if normalized.split('/').any(|segment| segment == "..") {
        return Err(ReorgError::destination("outside_project_root", raw));
    }

    let rooted = if normalized == project_root || normalized.starts_with(&format!("{project_root}/")) {
        normalized
    } else {
        paths::join(project_root, &normalized)
    };
    if rooted == project_root {
        return Err(ReorgError::destination("is_project_root", raw));
    }

    Ok(format!("{rooted}{folder_suffix}"))
}

/// Folder a non-skipped file lands in.
#[must_use]
pub fn destination_folder(
    file: &TrackedFile,
    base_path: &str,
    root: &str,
    mode: LayoutMode,
    project_root: &str,
) -> String {
    match mode {
        LayoutMode::ByCategory => paths::join(
            root,
            file.category.as_deref().unwrap_or(OTHER_CLASSIFICATION),
        ),
        LayoutMode::ByStructure => {
            let folder = file.folder();
            let relative = paths::strip_base(folder, base_path).unwrap_or_else(|| {
                paths::strip_base(folder, project_root).unwrap_or(folder)
            });
            paths::join(root, relative)
        }
    }
}

/// File name a transfer writes before uniquification.
#[must_use]
pub fn destination_name(file: &TrackedFile, action: FileAction, copy_suffix: &str) -> String {
    match action {
        FileAction::Copy => format!("{}{copy_suffix}{}", file.stem(), file.extension()),
        FileAction::Move | FileAction::Skip => file.file_name().to_string(),
    }
}

/// First free variant of `candidate`: `stem.ext`, then `stem_1.ext`, `stem_2.ext`, ...
///
/// A path is taken when it exists in the store or was already claimed during
/// the run. The chosen path is added to `claimed`.
pub fn unique_path<S: AssetStore + ?Sized>(
    store: &S,
    candidate: &str,
    claimed: &mut HashSet<String>,
) -> String {
    let is_free = |path: &str, claimed: &HashSet<String>| !store.exists(path) && !claimed.contains(path);

    let chosen = if is_free(candidate, claimed) {
        candidate.to_string()
    } else {
        let folder = paths::parent(candidate);
        let (stem, extension) = paths::split_extension(paths::file_name(candidate));
        (1usize..)
            .map(|n| paths::join(folder, &format!("{stem}_{n}{extension}")))
            .find(|path| is_free(path, claimed))
            .unwrap_or_else(|| candidate.to_string())
    };
    claimed.insert(chosen.clone());
    chosen
}
