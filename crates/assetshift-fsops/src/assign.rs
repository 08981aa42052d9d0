//! Per-file action assignment and worklist ordering.

use assetshift_config::{FileAction, OTHER_CLASSIFICATION, OrganizerSettings, SortKey};
use tracing::debug;

use crate::classify::classify;
use crate::model::{TrackedFile, Worklist};

/// Classify each file, apply folder overrides, and sort.
///
/// Priority per file: the first applying classification sets category and
/// action; otherwise the file falls to `Other` with `Other`'s action; then the
/// first active folder rule whose token equals a path segment replaces the
/// action (the category is kept). The sort is stable, so ties keep discovery
/// order.
#[must_use]
pub fn assign(files: Vec<TrackedFile>, settings: &OrganizerSettings) -> Worklist {
    let mut planned: Vec<TrackedFile> = files
        .into_iter()
        .map(|mut file| {
            match classify(&file, &settings.classifications, &settings.type_hierarchy)
                .or_else(|| settings.other())
            {
                Some(class) => {
                    file.category = Some(class.name.clone());
                    file.action = settings.action_for(class);
                }
                None => {
                    file.category = Some(OTHER_CLASSIFICATION.to_string());
                    file.action = FileAction::Skip;
                }
            }

            if let Some(rule) = settings
                .folder_rules
                .iter()
                .find(|rule| rule.matches(&file.path))
            {
                debug!(path = %file.path, token = %rule.token, action = rule.action.as_str(), "folder rule override");
                file.action = rule.action;
            }
            file
        })
        .collect();

    sort_worklist(&mut planned, settings.sort_key);
    Worklist::new(planned)
}

fn sort_worklist(files: &mut [TrackedFile], key: SortKey) {
    match key {
        SortKey::Path => files.sort_by(|a, b| a.path.cmp(&b.path)),
        SortKey::FileName => files.sort_by(|a, b| a.stem().cmp(b.stem())),
        SortKey::Category => files.sort_by(|a, b| {
            a.category
                .as_deref()
                .unwrap_or_default()
                .cmp(b.category.as_deref().unwrap_or_default())
        }),
    }
}
