//! Validation helpers for organizer settings documents.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{OTHER_CLASSIFICATION, OrganizerSettings};

/// Validate a settings snapshot after the action table has been reconciled.
///
/// # Errors
///
/// Returns `ConfigError::InvalidField` describing the first offending field.
pub fn validate_settings(settings: &OrganizerSettings) -> ConfigResult<()> {
    validate_classifications(settings)?;
    validate_folder_rules(settings)?;
    validate_suffix("copy_suffix", &settings.copy_suffix)?;
    validate_suffix("folder_suffix", &settings.folder_suffix)?;
    validate_project_root(&settings.project_root)?;
    validate_patterns(&settings.ignore_patterns)?;
    Ok(())
}

fn validate_classifications(settings: &OrganizerSettings) -> ConfigResult<()> {
    let Some(last) = settings.classifications.last() else {
        return Err(ConfigError::invalid(
            "classifications",
            "classifications",
            None,
            "empty_table",
        ));
    };
    if !last.is_other() {
        return Err(ConfigError::invalid(
            "classifications",
            "name",
            Some(last.name.clone()),
            "other_must_be_last",
        ));
    }

    let mut seen = HashSet::new();
    for class in &settings.classifications {
        if class.name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "classifications",
                "name",
                Some(class.name.clone()),
                "empty_name",
            ));
        }
        if class.name.contains('/') {
            return Err(ConfigError::invalid(
                "classifications",
                "name",
                Some(class.name.clone()),
                "contains_separator",
            ));
        }
        if !seen.insert(class.name.as_str()) {
            let reason = if class.name == OTHER_CLASSIFICATION {
                "duplicate_other"
            } else {
                "duplicate_name"
            };
            return Err(ConfigError::invalid(
                "classifications",
                "name",
                Some(class.name.clone()),
                reason,
            ));
        }
        if class.action_index >= settings.type_actions.len() {
            return Err(ConfigError::invalid(
                "classifications",
                format!("{}.action_index", class.name),
                Some(class.action_index.to_string()),
                "index_out_of_range",
            ));
        }
    }
    Ok(())
}

fn validate_folder_rules(settings: &OrganizerSettings) -> ConfigResult<()> {
    for rule in &settings.folder_rules {
        if rule.token.trim().is_empty() {
            return Err(ConfigError::invalid(
                "folder_rules",
                "token",
                Some(rule.token.clone()),
                "empty_token",
            ));
        }
        if rule.token.contains('/') || rule.token.contains('\\') {
            return Err(ConfigError::invalid(
                "folder_rules",
                "token",
                Some(rule.token.clone()),
                "contains_separator",
            ));
        }
    }
    Ok(())
}

fn validate_suffix(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.contains('/') || value.contains('\\') {
        return Err(ConfigError::invalid(
            "options",
            field,
            Some(value.to_string()),
            "contains_separator",
        ));
    }
    Ok(())
}

fn validate_project_root(value: &str) -> ConfigResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(
            "options",
            "project_root",
            Some(value.to_string()),
            "empty_root",
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(ConfigError::invalid(
            "options",
            "project_root",
            Some(value.to_string()),
            "not_a_single_segment",
        ));
    }
    Ok(())
}

fn validate_patterns(patterns: &[String]) -> ConfigResult<()> {
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(ConfigError::invalid(
                "options",
                "ignore_patterns",
                Some(pattern.clone()),
                "empty_pattern",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, FileAction, FolderRule};

    fn reason_of(err: &ConfigError) -> Option<&'static str> {
        match err {
            ConfigError::InvalidField { reason, .. } => Some(reason),
            _ => None,
        }
    }

    #[test]
    fn defaults_validate() {
        assert!(validate_settings(&OrganizerSettings::defaults()).is_ok());
    }

    #[test]
    fn other_must_be_last() {
        let mut settings = OrganizerSettings::defaults();
        let other = settings.classifications.pop().expect("other entry");
        settings.classifications.insert(0, other);
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(reason_of(&err), Some("other_must_be_last"));
    }

    #[test]
    fn duplicate_other_is_rejected() {
        let mut settings = OrganizerSettings::defaults();
        let index = settings.classifications.len();
        settings.type_actions.push(FileAction::Copy);
        settings
            .classifications
            .insert(0, Classification::new("Other", index, &[], &[]));
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(reason_of(&err), Some("duplicate_other"));
    }

    #[test]
    fn out_of_range_action_index_is_rejected() {
        let mut settings = OrganizerSettings::defaults();
        settings.classifications[0].action_index = 99;
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(reason_of(&err), Some("index_out_of_range"));
    }

    #[test]
    fn folder_rules_need_plain_tokens() {
        let mut settings = OrganizerSettings::defaults();
        settings
            .folder_rules
            .push(FolderRule::new("Assets/Plugins", FileAction::Skip));
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(reason_of(&err), Some("contains_separator"));

        settings.folder_rules.pop();
        settings.folder_rules.push(FolderRule::new("  ", FileAction::Skip));
        let err = validate_settings(&settings).unwrap_err();
        assert_eq!(reason_of(&err), Some("empty_token"));
    }

    #[test]
    fn suffixes_and_root_are_checked() {
        let mut settings = OrganizerSettings::defaults();
        settings.folder_suffix = "_out/nested".to_string();
        assert_eq!(
            reason_of(&validate_settings(&settings).unwrap_err()),
            Some("contains_separator")
        );

        let mut settings = OrganizerSettings::defaults();
        settings.project_root = "Assets/Sub".to_string();
        assert_eq!(
            reason_of(&validate_settings(&settings).unwrap_err()),
            Some("not_a_single_segment")
        );
    }
}
