//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use assetshift_config::OrganizerSettings;
use assetshift_fsops::{PlannedTransfer, Report};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_plan(transfers: &[PlannedTransfer], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(transfers),
        OutputFormat::Table => {
            print!("{}", plan_table(transfers));
            Ok(())
        }
    }
}

pub(crate) fn render_report(report: &Report, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            print!("{}", report_summary(report));
            Ok(())
        }
    }
}

pub(crate) fn render_settings(settings: &OrganizerSettings, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(settings),
        OutputFormat::Table => {
            print!("{}", settings_table(settings));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn plan_table(transfers: &[PlannedTransfer]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<14} {:<48} DESTINATION", "ACTION", "CATEGORY", "SOURCE");
    for transfer in transfers {
        let _ = writeln!(
            out,
            "{:<6} {:<14} {:<48} {}",
            transfer.action.as_str(),
            transfer.category.as_deref().unwrap_or("-"),
            transfer.source,
            transfer.destination.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "{} files", transfers.len());
    out
}

fn report_summary(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "run: {}", report.run_id);
    if let Some(root) = &report.destination_root {
        let _ = writeln!(out, "destination: {root}");
    }
    let _ = writeln!(
        out,
        "moved: {}  copied: {}  skipped: {}  failed: {}",
        report.moved,
        report.copied,
        report.skipped,
        report.failed()
    );
    if !report.rewritten.is_empty() {
        let _ = writeln!(out, "rewritten references: {}", report.rewritten.len());
    }
    if !report.deleted_folders.is_empty() {
        let _ = writeln!(out, "removed folders:");
        for folder in &report.deleted_folders {
            let _ = writeln!(out, "  {folder}");
        }
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    if !report.failures.is_empty() {
        let _ = writeln!(out, "failures:");
        for failure in &report.failures {
            let _ = writeln!(out, "  {}: {}", failure.path, failure.message);
        }
    }
    out
}

fn settings_table(settings: &OrganizerSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "project root: {}", settings.project_root);
    let _ = writeln!(out, "copy suffix: {:?}", settings.copy_suffix);
    let _ = writeln!(out, "folder suffix: {:?}", settings.folder_suffix);
    let _ = writeln!(out, "sort: {:?}", settings.sort_key);
    let _ = writeln!(out, "delete empty folders: {}", settings.delete_empty_folders);
    let _ = writeln!(out, "classifications:");
    for class in &settings.classifications {
        let _ = writeln!(
            out,
            "  {:<14} {:<5} {}",
            class.name,
            settings.action_for(class).as_str(),
            class
                .types
                .iter()
                .chain(class.extensions.iter())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if !settings.folder_rules.is_empty() {
        let _ = writeln!(out, "folder rules:");
        for rule in &settings.folder_rules {
            let state = if rule.active { "" } else { " (inactive)" };
            let _ = writeln!(out, "  {:<14} {}{state}", rule.token, rule.action.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetshift_config::FileAction;

    #[test]
    fn plan_table_marks_unplaced_files() {
        let table = plan_table(&[
            PlannedTransfer {
                source: "Assets/Foo/a.mat".into(),
                destination: Some("Assets/Out_Assets/Materials/a.mat".into()),
                action: FileAction::Copy,
                category: Some("Materials".into()),
            },
            PlannedTransfer {
                source: "Assets/Foo/x.cs".into(),
                destination: None,
                action: FileAction::Skip,
                category: Some("Scripts".into()),
            },
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("copy"));
        assert!(lines[1].ends_with("Assets/Out_Assets/Materials/a.mat"));
        assert!(lines[2].ends_with(" -"));
        assert_eq!(lines[3], "2 files");
    }

    #[test]
    fn settings_table_lists_every_classification() {
        let settings = OrganizerSettings::defaults();
        let table = settings_table(&settings);
        for class in &settings.classifications {
            assert!(table.contains(&class.name));
        }
        assert!(table.contains("Plugins"));
    }
}
