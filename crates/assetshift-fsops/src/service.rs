//! Reorganization engine: plans entry points and commits worklists.
//!
//! A commit runs five phases in order: path preparation, folder
//! pre-creation, per-file transfer, identifier rewrite, and cleanup. Only the
//! first two can abort a run; transfer and rewrite failures are recorded per
//! file, index refresh failures become report warnings, and the run continues. Progress is published on the event bus and
//! counted in metrics; neither can influence the run.

use std::collections::HashSet;

use assetshift_config::{FileAction, OrganizerSettings};
use assetshift_events::{Event, EventBus};
use assetshift_telemetry::Metrics;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::assign::assign;
use crate::error::{ReorgError, ReorgResult};
use crate::layout::{destination_folder, destination_name, destination_root, unique_path};
use crate::model::{
    CommitOptions, FailureKind, FileFailure, LayoutMode, Plan, PlannedTransfer, Report,
    RunContext, TransferRecord, Worklist,
};
use crate::paths;
use crate::resolve::Resolver;
use crate::rewrite::replace_identifiers;
use crate::store::{AssetStore, BatchScope};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepKind {
    PreparePaths,
    CreateFolders,
    Transfer,
    RewriteIdentifiers,
    Cleanup,
}

impl StepKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::PreparePaths => "prepare_paths",
            Self::CreateFolders => "create_folders",
            Self::Transfer => "transfer",
            Self::RewriteIdentifiers => "rewrite_identifiers",
            Self::Cleanup => "cleanup",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepStatus {
    Started,
    Completed,
    Failed,
    Skipped,
}

impl StepStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

enum StepOutcome {
    Completed(Option<String>),
    Skipped(Option<String>),
}

impl StepOutcome {
    const fn status(&self) -> StepStatus {
        match self {
            Self::Completed(_) => StepStatus::Completed,
            Self::Skipped(_) => StepStatus::Skipped,
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Self::Completed(detail) | Self::Skipped(detail) => detail.as_deref(),
        }
    }
}

/// Inputs for one commit. The worklist is consumed by the run.
pub struct CommitRequest<'a> {
    /// Planned files, in processing order.
    pub worklist: Worklist,
    /// Folder that structure-preserving layouts are relative to.
    pub base_path: &'a str,
    /// Requested destination root (before rooting and suffixing).
    pub destination_root: &'a str,
    /// Destination layout strategy.
    pub mode: LayoutMode,
    /// Commit options snapshot.
    pub options: &'a CommitOptions,
}

/// Service that plans and commits reorganizations, emitting progress events.
#[derive(Clone)]
pub struct ReorgService {
    events: EventBus,
    metrics: Metrics,
}

impl ReorgService {
    /// Construct a service backed by the shared event bus and metrics registry.
    #[must_use]
    pub const fn new(events: EventBus, metrics: Metrics) -> Self {
        Self { events, metrics }
    }

    /// Resolve `entry` and assign actions using `settings`.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` for missing entries, or a store or glob error.
    pub fn plan<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        entry: &str,
        settings: &OrganizerSettings,
    ) -> ReorgResult<Plan> {
        let resolution = Resolver::new(store, &settings.ignore_patterns)?.resolve(entry)?;
        let worklist = assign(resolution.files, settings);
        self.metrics.inc_phase("plan", StepStatus::Completed.as_str());
        info!(
            entry = %entry,
            files = worklist.len(),
            moves = worklist.count(FileAction::Move),
            copies = worklist.count(FileAction::Copy),
            "planned reorganization"
        );
        Ok(Plan {
            worklist,
            base_path: resolution.base_path,
        })
    }

    /// Compute where each planned file would land without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `DestinationInvalid` when the destination root is rejected.
    pub fn preview<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        request: &CommitRequest<'_>,
    ) -> ReorgResult<Vec<PlannedTransfer>> {
        let options = request.options;
        let root = destination_root(
            request.destination_root,
            &options.project_root,
            &options.folder_suffix,
        )?;
        self.metrics.inc_phase("preview", StepStatus::Completed.as_str());
        let mut claimed = HashSet::new();
        Ok(request
            .worklist
            .files()
            .iter()
            .map(|file| {
                let destination = (file.action != FileAction::Skip).then(|| {
                    let folder = destination_folder(
                        file,
                        request.base_path,
                        &root,
                        request.mode,
                        &options.project_root,
                    );
                    let candidate =
                        paths::join(&folder, &destination_name(file, file.action, &options.copy_suffix));
                    if file.action == FileAction::Move && candidate == file.path {
                        candidate
                    } else {
                        unique_path(store, &candidate, &mut claimed)
                    }
                });
                PlannedTransfer {
                    source: file.path.clone(),
                    destination,
                    action: file.action,
                    category: file.category.clone(),
                }
            })
            .collect())
    }

    /// Commit a worklist and return its report.
    ///
    /// # Errors
    ///
    /// Returns an error only when the run aborts: an invalid destination, or a
    /// folder that cannot be created. Per-file failures are recorded in the
    /// report instead.
    pub fn commit<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        request: CommitRequest<'_>,
    ) -> ReorgResult<Report> {
        let run_id = Uuid::new_v4();
        let total = request.worklist.len();
        self.publish_event(Event::RunStarted { run_id, total });
        info!(run_id = %run_id, total, mode = request.mode.as_str(), "reorganization started");

        let CommitRequest {
            worklist,
            base_path,
            destination_root: destination,
            mode,
            options,
        } = request;
        let mut ctx = RunContext::new(run_id, worklist);

        match self.execute(store, &mut ctx, base_path, destination, mode, options) {
            Ok(()) => {
                let report = ctx.into_report();
                self.metrics.inc_run("completed");
                self.publish_event(Event::RunCompleted {
                    run_id,
                    moved: report.moved,
                    copied: report.copied,
                    skipped: report.skipped,
                    failed: report.failed(),
                });
                info!(
                    run_id = %run_id,
                    moved = report.moved,
                    copied = report.copied,
                    skipped = report.skipped,
                    failed = report.failed(),
                    "reorganization completed"
                );
                Ok(report)
            }
            Err(err) => {
                let detail = format!("{err:#}");
                self.metrics.inc_run("failed");
                self.publish_event(Event::RunFailed {
                    run_id,
                    message: detail.clone(),
                });
                error!(run_id = %run_id, error = %detail, "reorganization failed");
                Err(err)
            }
        }
    }

    fn execute<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        base_path: &str,
        destination: &str,
        mode: LayoutMode,
        options: &CommitOptions,
    ) -> ReorgResult<()> {
        let root = self.run_prepare_paths(store, ctx, destination, options)?;

        let transfer_batch = BatchScope::open(store);
        self.run_create_folders(store, ctx, base_path, &root, mode, options)?;
        self.run_transfer(store, ctx, options)?;
        close_batch(ctx, transfer_batch, StepKind::Transfer);

        let rewrite_batch = BatchScope::open(store);
        self.run_rewrite(store, ctx, options)?;
        close_batch(ctx, rewrite_batch, StepKind::RewriteIdentifiers);

        self.run_cleanup(store, ctx, options)
    }

    fn run_prepare_paths<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        destination: &str,
        options: &CommitOptions,
    ) -> ReorgResult<String> {
        let root = destination_root(destination, &options.project_root, &options.folder_suffix)?;
        let root_clone = root.clone();
        self.execute_step(ctx, StepKind::PreparePaths, move |ctx| {
            ensure_folder(store, ctx, &root_clone)?;
            ctx.report.destination_root = Some(root_clone.clone());
            Ok(StepOutcome::Completed(Some(format!("root={root_clone}"))))
        })?;
        Ok(root)
    }

    fn run_create_folders<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        base_path: &str,
        root: &str,
        mode: LayoutMode,
        options: &CommitOptions,
    ) -> ReorgResult<()> {
        self.execute_step(ctx, StepKind::CreateFolders, |ctx| {
            let before = ctx.created_folders.len();
            for idx in 0..ctx.files.len() {
                let file = &ctx.files[idx];
                if file.action == FileAction::Skip {
                    continue;
                }
                let folder = destination_folder(file, base_path, root, mode, &options.project_root);
                ensure_folder(store, ctx, &folder)?;
                ctx.folders[idx] = Some(folder);
            }
            let created = ctx.created_folders.len() - before;
            Ok(StepOutcome::Completed(Some(format!("created={created}"))))
        })
    }

    fn run_transfer<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        options: &CommitOptions,
    ) -> ReorgResult<()> {
        let run_id = ctx.run_id;
        let metrics = self.metrics.clone();
        self.execute_step(ctx, StepKind::Transfer, move |ctx| {
            let total = ctx.files.len();
            for idx in 0..total {
                let file = ctx.files[idx].clone();
                self.publish_event(Event::FileProgress {
                    run_id,
                    index: idx + 1,
                    total,
                    path: file.path.clone(),
                });

                let Some(folder) = ctx.folders[idx].clone() else {
                    ctx.report.skipped += 1;
                    metrics.inc_file(FileAction::Skip.as_str(), "ok");
                    continue;
                };

                let candidate =
                    paths::join(&folder, &destination_name(&file, file.action, &options.copy_suffix));
                if file.action == FileAction::Move && candidate == file.path {
                    debug!(path = %file.path, "already at destination");
                    ctx.report.skipped += 1;
                    metrics.inc_file(FileAction::Move.as_str(), "in_place");
                    continue;
                }
                let target = unique_path(store, &candidate, &mut ctx.claimed);

                let outcome = match file.action {
                    FileAction::Move => store.move_file(&file.path, &target).map(|()| {
                        ctx.vacated_folders.insert(file.folder().to_string());
                        ctx.report.moved += 1;
                    }),
                    FileAction::Copy => store.copy_file(&file.path, &target).map(|()| {
                        match store.stable_id(&target) {
                            Some(new_id) => ctx.remap.insert(file.stable_id.clone(), new_id),
                            None => warn!(path = %target, "copy has no stable id; references stay unmapped"),
                        }
                        ctx.new_copies.push(target.clone());
                        ctx.report.copied += 1;
                    }),
                    FileAction::Skip => Ok(()),
                };

                match outcome {
                    Ok(()) => {
                        debug!(source = %file.path, destination = %target, action = file.action.as_str(), "transferred");
                        metrics.inc_file(file.action.as_str(), "ok");
                        ctx.report.transfers.push(TransferRecord {
                            source: file.path.clone(),
                            destination: target,
                            action: file.action,
                        });
                    }
                    Err(err) => {
                        ctx.claimed.remove(&target);
                        record_failure(ctx, &metrics, &file.path, file.action, FailureKind::Transfer, &err);
                    }
                }
            }
            Ok(StepOutcome::Completed(Some(format!(
                "moved={} copied={} skipped={}",
                ctx.report.moved, ctx.report.copied, ctx.report.skipped
            ))))
        })
    }

    fn run_rewrite<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        options: &CommitOptions,
    ) -> ReorgResult<()> {
        let metrics = self.metrics.clone();
        self.execute_step(ctx, StepKind::RewriteIdentifiers, move |ctx| {
            if ctx.remap.is_empty() {
                return Ok(StepOutcome::Skipped(Some("no copies".into())));
            }
            let copies = ctx.new_copies.clone();
            for copy in copies.iter().filter(|copy| options.is_reference_bearing(copy)) {
                let result = store.read_text(copy).and_then(|text| {
                    match replace_identifiers(&text, &ctx.remap) {
                        Some((rewritten, count)) => {
                            store.write_text(copy, &rewritten)?;
                            Ok(Some(count))
                        }
                        None => Ok(None),
                    }
                });
                match result {
                    Ok(Some(count)) => {
                        debug!(path = %copy, substitutions = count, "rewrote identifiers");
                        metrics.inc_identifier_rewrite();
                        ctx.report.rewritten.push(copy.clone());
                    }
                    Ok(None) => {}
                    Err(err) => {
                        record_failure(ctx, &metrics, copy, FileAction::Copy, FailureKind::Rewrite, &err);
                    }
                }
            }
            Ok(StepOutcome::Completed(Some(format!(
                "rewritten={}",
                ctx.report.rewritten.len()
            ))))
        })
    }

    fn run_cleanup<S: AssetStore + ?Sized>(
        &self,
        store: &S,
        ctx: &mut RunContext,
        options: &CommitOptions,
    ) -> ReorgResult<()> {
        self.execute_step(ctx, StepKind::Cleanup, |ctx| {
            if !options.delete_empty_folders {
                return Ok(StepOutcome::Skipped(Some("disabled".into())));
            }
            let candidates: Vec<String> = ctx
                .created_folders
                .union(&ctx.vacated_folders)
                .filter(|folder| *folder != &options.project_root)
                .cloned()
                .collect();
            let deleted = cleanup_empty_folders(store, &candidates);
            let detail = format!("deleted={}", deleted.len());
            ctx.report.deleted_folders = deleted;
            Ok(StepOutcome::Completed(Some(detail)))
        })
    }

    fn execute_step<F>(&self, ctx: &mut RunContext, step: StepKind, op: F) -> ReorgResult<()>
    where
        F: FnOnce(&mut RunContext) -> ReorgResult<StepOutcome>,
    {
        let run_id = ctx.run_id;
        self.record_step(run_id, step, StepStatus::Started, None);

        match op(ctx) {
            Ok(outcome) => {
                self.record_step(run_id, step, outcome.status(), outcome.detail());
                Ok(())
            }
            Err(err) => {
                let detail = err.to_string();
                self.record_step(run_id, step, StepStatus::Failed, Some(&detail));
                Err(err)
            }
        }
    }

    fn record_step(&self, run_id: Uuid, step: StepKind, status: StepStatus, detail: Option<&str>) {
        match status {
            StepStatus::Failed => {
                error!(run_id = %run_id, step = step.as_str(), detail = detail.unwrap_or_default(), "phase failed");
            }
            StepStatus::Started => debug!(run_id = %run_id, step = step.as_str(), "phase started"),
            StepStatus::Completed | StepStatus::Skipped => info!(
                run_id = %run_id,
                step = step.as_str(),
                status = status.as_str(),
                detail = detail.unwrap_or_default(),
                "phase finished"
            ),
        }
        self.metrics.inc_phase(step.as_str(), status.as_str());
        self.publish_event(Event::PhaseProgress {
            run_id,
            phase: step.as_str().to_string(),
            status: status.as_str().to_string(),
        });
    }

    fn publish_event(&self, event: Event) {
        let kind = event.kind();
        let id = self.events.publish(event);
        debug!(event_id = id, kind, "published reorganization event");
    }
}

/// Delete every folder in `folders` that is (still) empty, longest path first.
///
/// Returns the folders that were removed. Missing folders are ignored, so a
/// second pass over the same set removes nothing.
pub fn cleanup_empty_folders<S: AssetStore + ?Sized>(store: &S, folders: &[String]) -> Vec<String> {
    let mut ordered: Vec<&String> = folders.iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| b.cmp(a)));
    ordered.dedup();

    let mut deleted = Vec::new();
    for folder in ordered {
        if !store.is_dir(folder) {
            continue;
        }
        match store.is_empty_dir(folder) {
            Ok(true) => match store.delete(folder) {
                Ok(()) => {
                    debug!(folder = %folder, "removed empty folder");
                    deleted.push(folder.clone());
                }
                Err(err) => warn!(error = %err, folder = %folder, "failed to remove empty folder"),
            },
            Ok(false) => {}
            Err(err) => warn!(error = %err, folder = %folder, "failed to read cleanup folder"),
        }
    }
    deleted
}

/// Create `folder` and any missing ancestors, recording each one created.
fn ensure_folder<S: AssetStore + ?Sized>(
    store: &S,
    ctx: &mut RunContext,
    folder: &str,
) -> ReorgResult<()> {
    let missing: Vec<&str> = paths::ancestors(folder)
        .take_while(|path| !store.exists(path))
        .collect();
    for path in missing.into_iter().rev() {
        store.create_dir(path)?;
        ctx.created_folders.insert(path.to_string());
    }
    if !store.is_dir(folder) {
        return Err(ReorgError::InvalidInput {
            field: "destination_folder",
            reason: "not_a_directory",
            value: Some(folder.to_string()),
        });
    }
    Ok(())
}

/// Close a batch opened after writes began; refresh errors are kept as warnings.
fn close_batch<S: AssetStore + ?Sized>(
    ctx: &mut RunContext,
    batch: BatchScope<'_, S>,
    step: StepKind,
) {
    if let Err(err) = batch.close() {
        let message = render_error(&err);
        warn!(run_id = %ctx.run_id, step = step.as_str(), error = %message, "asset index refresh failed");
        ctx.report
            .warnings
            .push(format!("{}: {message}", step.as_str()));
    }
}

fn record_failure(
    ctx: &mut RunContext,
    metrics: &Metrics,
    path: &str,
    action: FileAction,
    kind: FailureKind,
    err: &ReorgError,
) {
    let message = render_error(err);
    warn!(path = %path, action = action.as_str(), kind = ?kind, error = %message, "file failed");
    metrics.inc_file(action.as_str(), "failed");
    ctx.report.failures.push(FileFailure {
        path: path.to_string(),
        kind,
        message,
    });
}

fn render_error(err: &ReorgError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalAssetStore;
    use crate::model::TrackedFile;
    use anyhow::Result;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    type TestResult<T> = Result<T>;

    fn service() -> TestResult<(ReorgService, EventBus, Metrics)> {
        let events = EventBus::with_capacity(256);
        let metrics = Metrics::new()?;
        Ok((ReorgService::new(events.clone(), metrics.clone()), events, metrics))
    }

    fn options() -> CommitOptions {
        CommitOptions {
            copy_suffix: String::new(),
            folder_suffix: "_Assets".into(),
            delete_empty_folders: true,
            project_root: "Assets".into(),
            reference_extensions: vec![".mat".into()],
        }
    }

    fn asset(root: &Path, path: &str, guid: &str, body: &str) -> TestResult<()> {
        let absolute = root.join(path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&absolute, body)?;
        fs::write(root.join(format!("{path}.meta")), format!("guid: {guid}\n"))?;
        Ok(())
    }

    fn planned(path: &str, guid: &str, category: &str, action: FileAction) -> TrackedFile {
        TrackedFile {
            category: Some(category.into()),
            action,
            ..TrackedFile::new(path, guid, None)
        }
    }

    #[test]
    fn invalid_destination_aborts_before_writes() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Foo/a.mat", "aaa", "")?;
        let store = LocalAssetStore::open(temp.path(), &[])?;
        let (service, events, metrics) = service()?;
        let mut stream = events.subscribe(None);

        let opts = options();
        let result = service.commit(
            &store,
            CommitRequest {
                worklist: Worklist::new(vec![planned("Assets/Foo/a.mat", "aaa", "Materials", FileAction::Move)]),
                base_path: "Assets/Foo",
                destination_root: "",
                mode: LayoutMode::ByCategory,
                options: &opts,
            },
        );
        assert!(matches!(result, Err(ReorgError::DestinationInvalid { reason: "empty", .. })));
        assert!(store.exists("Assets/Foo/a.mat"));
        assert_eq!(metrics.snapshot().runs_failed, 1);

        let kinds: Vec<&str> = stream.drain_ready().iter().map(|e| e.event.kind()).collect();
        assert_eq!(kinds, vec!["run_started", "run_failed"]);
        Ok(())
    }

    #[test]
    fn transfer_failures_are_recorded_and_the_run_continues() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Foo/a.mat", "aaa", "")?;
        asset(temp.path(), "Assets/Foo/b.mat", "bbb", "")?;
        let store = LocalAssetStore::open(temp.path(), &[])?;
        let (service, _events, metrics) = service()?;

        let opts = options();
        let report = service.commit(
            &store,
            CommitRequest {
                worklist: Worklist::new(vec![
                    planned("Assets/Foo/missing.mat", "zzz", "Materials", FileAction::Copy),
                    planned("Assets/Foo/b.mat", "bbb", "Materials", FileAction::Copy),
                ]),
                base_path: "Assets/Foo",
                destination_root: "Out",
                mode: LayoutMode::ByCategory,
                options: &opts,
            },
        )?;
        assert_eq!(report.copied, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::Transfer);
        assert_eq!(report.failures[0].path, "Assets/Foo/missing.mat");
        assert_eq!(report.destination_of("Assets/Foo/b.mat"), Some("Assets/Out_Assets/Materials/b.mat"));
        assert_eq!(metrics.file_count("copy", "failed"), 1);
        Ok(())
    }

    struct RefreshFailingStore {
        inner: LocalAssetStore,
    }

    impl AssetStore for RefreshFailingStore {
        fn list_files(&self, path: &str, recursive: bool) -> ReorgResult<Vec<String>> {
            self.inner.list_files(path, recursive)
        }
        fn exists(&self, path: &str) -> bool {
            self.inner.exists(path)
        }
        fn is_dir(&self, path: &str) -> bool {
            self.inner.is_dir(path)
        }
        fn is_empty_dir(&self, path: &str) -> ReorgResult<bool> {
            self.inner.is_empty_dir(path)
        }
        fn create_dir(&self, path: &str) -> ReorgResult<()> {
            self.inner.create_dir(path)
        }
        fn move_file(&self, src: &str, dst: &str) -> ReorgResult<()> {
            self.inner.move_file(src, dst)
        }
        fn copy_file(&self, src: &str, dst: &str) -> ReorgResult<()> {
            self.inner.copy_file(src, dst)
        }
        fn delete(&self, path: &str) -> ReorgResult<()> {
            self.inner.delete(path)
        }
        fn read_text(&self, path: &str) -> ReorgResult<String> {
            self.inner.read_text(path)
        }
        fn write_text(&self, path: &str, contents: &str) -> ReorgResult<()> {
            self.inner.write_text(path, contents)
        }
        fn begin_batch(&self) {
            self.inner.begin_batch();
        }
        fn end_batch(&self) -> ReorgResult<()> {
            self.inner.end_batch()?;
            Err(ReorgError::io(
                "end_batch",
                "index",
                std::io::Error::other("index unavailable"),
            ))
        }
        fn refresh(&self) -> ReorgResult<()> {
            self.inner.refresh()
        }
        fn dependencies_of(&self, path: &str) -> ReorgResult<Vec<String>> {
            self.inner.dependencies_of(path)
        }
        fn stable_id(&self, path: &str) -> Option<String> {
            self.inner.stable_id(path)
        }
        fn type_of(&self, path: &str) -> Option<String> {
            self.inner.type_of(path)
        }
    }

    #[test]
    fn refresh_failures_after_transfer_do_not_abort_the_run() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Foo/a.mat", "aaa", "ref: {guid: bbb}")?;
        asset(temp.path(), "Assets/Foo/b.mat", "bbb", "")?;
        asset(temp.path(), "Assets/Old/c.mat", "ccc", "")?;
        let store = RefreshFailingStore {
            inner: LocalAssetStore::open(temp.path(), &[])?,
        };
        let (service, _events, metrics) = service()?;

        let opts = options();
        let report = service.commit(
            &store,
            CommitRequest {
                worklist: Worklist::new(vec![
                    planned("Assets/Foo/a.mat", "aaa", "Materials", FileAction::Copy),
                    planned("Assets/Foo/b.mat", "bbb", "Materials", FileAction::Copy),
                    planned("Assets/Old/c.mat", "ccc", "Materials", FileAction::Move),
                ]),
                base_path: "Assets",
                destination_root: "Out",
                mode: LayoutMode::ByCategory,
                options: &opts,
            },
        )?;

        assert_eq!(report.copied, 2);
        assert_eq!(report.moved, 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].starts_with("transfer: reorg io failure"));
        assert!(report.warnings[1].starts_with("rewrite_identifiers: "));

        let copied_b = store
            .stable_id("Assets/Out_Assets/Materials/b.mat")
            .ok_or_else(|| anyhow::anyhow!("copy has no stable id"))?;
        assert_eq!(
            store.read_text("Assets/Out_Assets/Materials/a.mat")?,
            format!("ref: {{guid: {copied_b}}}")
        );
        assert_eq!(report.rewritten, vec!["Assets/Out_Assets/Materials/a.mat".to_string()]);
        assert_eq!(report.deleted_folders, vec!["Assets/Old".to_string()]);
        assert_eq!(metrics.snapshot().runs_completed, 1);
        Ok(())
    }

    #[test]
    fn moves_in_place_are_not_renamed() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Out_Assets/Materials/a.mat", "aaa", "")?;
        let store = LocalAssetStore::open(temp.path(), &[])?;
        let (service, _events, _metrics) = service()?;

        let opts = options();
        let report = service.commit(
            &store,
            CommitRequest {
                worklist: Worklist::new(vec![planned(
                    "Assets/Out_Assets/Materials/a.mat",
                    "aaa",
                    "Materials",
                    FileAction::Move,
                )]),
                base_path: "Assets",
                destination_root: "Assets/Out",
                mode: LayoutMode::ByCategory,
                options: &opts,
            },
        )?;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.moved, 0);
        assert!(store.exists("Assets/Out_Assets/Materials/a.mat"));
        Ok(())
    }

    #[test]
    fn phases_are_published_in_order() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Foo/a.mat", "aaa", "")?;
        let store = LocalAssetStore::open(temp.path(), &[])?;
        let (service, events, _metrics) = service()?;
        let mut stream = events.subscribe(None);

        let mut opts = options();
        opts.delete_empty_folders = false;
        service.commit(
            &store,
            CommitRequest {
                worklist: Worklist::new(vec![planned("Assets/Foo/a.mat", "aaa", "Materials", FileAction::Move)]),
                base_path: "Assets/Foo",
                destination_root: "Out",
                mode: LayoutMode::ByCategory,
                options: &opts,
            },
        )?;

        let phases: Vec<(String, String)> = stream
            .drain_ready()
            .into_iter()
            .filter_map(|envelope| match envelope.event {
                Event::PhaseProgress { phase, status, .. } => Some((phase, status)),
                _ => None,
            })
            .filter(|(_, status)| status != "started")
            .collect();
        assert_eq!(
            phases,
            vec![
                ("prepare_paths".to_string(), "completed".to_string()),
                ("create_folders".to_string(), "completed".to_string()),
                ("transfer".to_string(), "completed".to_string()),
                ("rewrite_identifiers".to_string(), "skipped".to_string()),
                ("cleanup".to_string(), "skipped".to_string()),
            ]
        );
        assert!(store.is_dir("Assets/Foo"));
        Ok(())
    }

    #[test]
    fn preview_matches_commit_destinations() -> TestResult<()> {
        let temp = TempDir::new()?;
        asset(temp.path(), "Assets/Foo/a.mat", "aaa", "")?;
        asset(temp.path(), "Assets/Bar/a.mat", "bbb", "")?;
        asset(temp.path(), "Assets/Foo/skip.mat", "ccc", "")?;
        let store = LocalAssetStore::open(temp.path(), &[])?;
        let (service, _events, _metrics) = service()?;
        let opts = options();

        let files = vec![
            planned("Assets/Bar/a.mat", "bbb", "Materials", FileAction::Copy),
            planned("Assets/Foo/a.mat", "aaa", "Materials", FileAction::Copy),
            planned("Assets/Foo/skip.mat", "ccc", "Materials", FileAction::Skip),
        ];
        let request = CommitRequest {
            worklist: Worklist::new(files),
            base_path: "Assets",
            destination_root: "Out",
            mode: LayoutMode::ByCategory,
            options: &opts,
        };
        let preview = service.preview(&store, &request)?;
        assert!(!store.exists("Assets/Out_Assets"));
        let report = service.commit(&store, request)?;

        for planned in &preview {
            assert_eq!(
                planned.destination.as_deref(),
                report.destination_of(&planned.source)
            );
        }
        assert_eq!(preview[1].destination.as_deref(), Some("Assets/Out_Assets/Materials/a_1.mat"));
        assert!(preview[2].destination.is_none());
        Ok(())
    }
}
