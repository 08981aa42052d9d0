use std::fs;

use assetshift_config::{
    ConfigError, ConfigWarning, FileAction, FolderRule, OrganizerSettings, SortKey, load_or_init,
    load_settings, save_settings,
};
use serde_json::{Value, json};
use tempfile::TempDir;

type TestResult<T> = anyhow::Result<T>;

#[test]
fn settings_survive_a_save_and_reload() -> TestResult<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("nested/assetshift.settings.json");

    let created = load_or_init(&path)?;
    assert!(path.exists());
    assert_eq!(created.settings, OrganizerSettings::defaults());

    let mut settings = created.settings;
    settings.sort_key = SortKey::Category;
    settings.copy_suffix = String::new();
    settings.folder_rules.push(FolderRule::new("ThirdParty", FileAction::Skip));
    save_settings(&path, &settings)?;

    let reloaded = load_settings(&path)?;
    assert!(reloaded.warnings.is_empty());
    assert_eq!(reloaded.settings, settings);
    Ok(())
}

#[test]
fn stale_action_tables_are_rebuilt_on_load() -> TestResult<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("settings.json");
    let mut document: Value = serde_json::to_value(OrganizerSettings::defaults())?;
    document["type_actions"] = json!(["move", "move"]);
    fs::write(&path, serde_json::to_string_pretty(&document)?)?;

    let loaded = load_settings(&path)?;
    let expected = loaded.settings.classifications.len();
    assert_eq!(
        loaded.warnings,
        vec![ConfigWarning::ActionTableRebuilt { expected, found: 2 }]
    );
    assert_eq!(loaded.settings.type_actions[..2], [FileAction::Move, FileAction::Move]);
    assert!(
        loaded.settings.type_actions[2..]
            .iter()
            .all(|action| *action == FileAction::Skip)
    );
    Ok(())
}

#[test]
fn partial_documents_fall_back_to_defaults() -> TestResult<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("settings.json");
    fs::write(&path, r#"{ "delete_empty_folders": false }"#)?;

    let loaded = load_settings(&path)?;
    assert!(!loaded.settings.delete_empty_folders);
    assert_eq!(
        loaded.settings.classifications,
        OrganizerSettings::defaults().classifications
    );
    Ok(())
}

#[test]
fn invalid_documents_are_rejected_with_context() -> TestResult<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("settings.json");

    fs::write(&path, r#"{ "folder_suffix": "a/b" }"#)?;
    assert!(matches!(
        load_settings(&path),
        Err(ConfigError::InvalidField { field, reason: "contains_separator", .. }) if field == "folder_suffix"
    ));

    fs::write(&path, "not json")?;
    assert!(matches!(load_settings(&path), Err(ConfigError::Json { .. })));

    assert!(matches!(
        load_settings(&temp.path().join("missing.json")),
        Err(ConfigError::Io { .. })
    ));
    Ok(())
}
