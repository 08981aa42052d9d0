use anyhow::anyhow;
use assetshift_config::{OrganizerSettings, validate_settings};
use assetshift_events::{Event, EventStream};
use assetshift_fsops::{CommitOptions, CommitRequest, LayoutMode, PlannedTransfer, Report, Worklist};

use crate::cli::{ApplyArgs, LayoutArgs, PlanArgs, SwapDirection};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_plan, render_report};

pub(crate) fn handle_plan(ctx: &AppContext, args: &PlanArgs) -> CliResult<()> {
    let mut settings = ctx.load_settings()?;
    apply_layout_overrides(&mut settings, &args.layout)?;
    let store = ctx.open_store(&settings)?;

    let mut plan = ctx.service.plan(&store, &args.entry, &settings)?;
    swap_actions(&mut plan.worklist, args.layout.swap);

    let transfers = match args.dest.as_deref() {
        Some(dest) => {
            let options = CommitOptions::from_settings(&settings);
            ctx.service.preview(
                &store,
                &CommitRequest {
                    worklist: plan.worklist,
                    base_path: &plan.base_path,
                    destination_root: dest,
                    mode: LayoutMode::from(args.layout.mode),
                    options: &options,
                },
            )?
        }
        None => unplaced(&plan.worklist),
    };
    render_plan(&transfers, ctx.output)
}

pub(crate) async fn handle_apply(ctx: &AppContext, args: ApplyArgs) -> CliResult<()> {
    let mut settings = ctx.load_settings()?;
    apply_layout_overrides(&mut settings, &args.layout)?;
    if args.keep_empty_folders {
        settings.delete_empty_folders = false;
    }
    let store = ctx.open_store(&settings)?;

    let progress = (!args.quiet).then(|| tokio::spawn(print_progress(ctx.events.subscribe(None))));

    let service = ctx.service.clone();
    let ApplyArgs {
        entry,
        dest,
        layout,
        ..
    } = args;
    let result = tokio::task::spawn_blocking(move || -> CliResult<Report> {
        let mut plan = service.plan(&store, &entry, &settings)?;
        swap_actions(&mut plan.worklist, layout.swap);
        let options = CommitOptions::from_settings(&settings);
        Ok(service.commit(
            &store,
            CommitRequest {
                worklist: plan.worklist,
                base_path: &plan.base_path,
                destination_root: &dest,
                mode: LayoutMode::from(layout.mode),
                options: &options,
            },
        )?)
    })
    .await
    .map_err(|err| CliError::failure(anyhow!("reorganization task failed: {err}")))?;

    if let Some(handle) = progress {
        if result.is_ok() {
            let _ = handle.await;
        } else {
            handle.abort();
        }
    }

    let report = result?;
    render_report(&report, ctx.output)?;
    if args.metrics {
        let text = ctx
            .metrics
            .render()
            .map_err(|err| CliError::failure(anyhow!("failed to render metrics: {err}")))?;
        print!("{text}");
    }

    if report.failed() > 0 {
        return Err(CliError::failure(anyhow!(
            "{} of {} files failed",
            report.failed(),
            report.moved + report.copied + report.skipped + report.failed()
        )));
    }
    Ok(())
}

fn apply_layout_overrides(settings: &mut OrganizerSettings, layout: &LayoutArgs) -> CliResult<()> {
    if let Some(suffix) = &layout.copy_suffix {
        settings.copy_suffix.clone_from(suffix);
    }
    if let Some(suffix) = &layout.folder_suffix {
        settings.folder_suffix.clone_from(suffix);
    }
    validate_settings(settings)?;
    Ok(())
}

fn swap_actions(worklist: &mut Worklist, swap: Option<SwapDirection>) {
    if let Some(direction) = swap {
        let (from, to) = direction.actions();
        worklist.retarget(from, to);
    }
}

fn unplaced(worklist: &Worklist) -> Vec<PlannedTransfer> {
    worklist
        .files()
        .iter()
        .map(|file| PlannedTransfer {
            source: file.path.clone(),
            destination: None,
            action: file.action,
            category: file.category.clone(),
        })
        .collect()
}

async fn print_progress(mut stream: EventStream) {
    while let Some(envelope) = stream.next().await {
        match envelope.event {
            Event::FileProgress {
                index, total, path, ..
            } => eprintln!("[{index}/{total}] {path}"),
            Event::PhaseProgress { phase, status, .. } if status == "failed" => {
                eprintln!("phase {phase} failed");
            }
            Event::RunCompleted { .. } | Event::RunFailed { .. } => break,
            _ => {}
        }
    }
}
