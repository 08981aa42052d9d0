//! Ordered, data-defined classification.

use assetshift_config::{Classification, TypeHierarchy};

use crate::model::TrackedFile;
use crate::paths;

/// First classification in `classifications` that applies to `file`.
///
/// A classification applies when the file's type tag equals or descends from
/// one of its types, or when the path ends with one of its extensions
/// (case-insensitive). Callers fall back to the `Other` bucket on `None`.
#[must_use]
pub fn classify<'a>(
    file: &TrackedFile,
    classifications: &'a [Classification],
    hierarchy: &TypeHierarchy,
) -> Option<&'a Classification> {
    classifications
        .iter()
        .find(|class| applies(class, file, hierarchy))
}

fn applies(class: &Classification, file: &TrackedFile, hierarchy: &TypeHierarchy) -> bool {
    let type_match = file.type_tag.as_deref().is_some_and(|tag| {
        class
            .types
            .iter()
            .any(|candidate| hierarchy.is_a(tag, candidate))
    });
    type_match
        || class
            .extensions
            .iter()
            .any(|ext| paths::has_extension(&file.path, ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetshift_config::OrganizerSettings;

    fn file(path: &str, tag: Option<&str>) -> TrackedFile {
        TrackedFile::new(path, "id", tag.map(str::to_string))
    }

    #[test]
    fn exact_and_subtype_tags_match() {
        let settings = OrganizerSettings::defaults();
        let material = classify(
            &file("Assets/a.mat", Some("Material")),
            &settings.classifications,
            &settings.type_hierarchy,
        );
        assert_eq!(material.map(|c| c.name.as_str()), Some("Materials"));

        let hierarchy = TypeHierarchy::from_pairs(&[("CustomTexture", "Texture")]);
        let texture = classify(
            &file("Assets/t.bin", Some("CustomTexture")),
            &settings.classifications,
            &hierarchy,
        );
        assert_eq!(texture.map(|c| c.name.as_str()), Some("Textures"));
    }

    #[test]
    fn extension_matches_without_type() {
        let settings = OrganizerSettings::defaults();
        let model = classify(
            &file("Assets/Plugins/x.FBX", None),
            &settings.classifications,
            &settings.type_hierarchy,
        );
        assert_eq!(model.map(|c| c.name.as_str()), Some("Models"));
    }

    #[test]
    fn first_declared_match_wins() {
        let classes = vec![
            Classification::new("First", 0, &["Material"], &[]),
            Classification::new("Second", 1, &[], &[".mat"]),
        ];
        let chosen = classify(
            &file("Assets/a.mat", Some("Material")),
            &classes,
            &TypeHierarchy::default(),
        );
        assert_eq!(chosen.map(|c| c.name.as_str()), Some("First"));
    }

    #[test]
    fn unknown_files_return_none_deterministically() {
        let settings = OrganizerSettings::defaults();
        let target = file("Assets/readme.txt", None);
        for _ in 0..2 {
            assert!(
                classify(&target, &settings.classifications, &settings.type_hierarchy).is_none()
            );
        }
    }
}
