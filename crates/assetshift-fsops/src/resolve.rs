//! Entry-point resolution into the set of files to process.

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::error::{ReorgError, ReorgResult};
use crate::model::{Resolution, TrackedFile};
use crate::paths;
use crate::store::AssetStore;

/// Expands an entry point (folder or file) into tracked files.
pub struct Resolver<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    ignore: Option<GlobSet>,
}

impl<'a, S: AssetStore + ?Sized> Resolver<'a, S> {
    /// Build a resolver that excludes paths matching `ignore_patterns`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is empty or fails to compile.
    pub fn new(store: &'a S, ignore_patterns: &[String]) -> ReorgResult<Self> {
        Ok(Self {
            store,
            ignore: build_globset(ignore_patterns, "ignore_patterns")?,
        })
    }

    /// Resolve `entry` into its file set and base path.
    ///
    /// Folders expand to every trackable file beneath them; files expand to
    /// their transitive reference set.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` when `entry` does not exist, or a store error
    /// when listing or dependency queries fail.
    pub fn resolve(&self, entry: &str) -> ReorgResult<Resolution> {
        let entry = paths::normalize(entry);
        if entry.is_empty() || !self.store.exists(&entry) {
            return Err(ReorgError::EntryNotFound { path: entry });
        }

        let (candidates, base_path) = if self.store.is_dir(&entry) {
            (self.store.list_files(&entry, true)?, entry.clone())
        } else {
            (
                self.store.dependencies_of(&entry)?,
                paths::parent(&entry).to_string(),
            )
        };

        let mut seen = HashSet::new();
        let mut files = Vec::with_capacity(candidates.len());
        for path in candidates {
            let path = paths::normalize(&path);
            if !seen.insert(path.clone()) || self.is_ignored(&path) || self.store.is_dir(&path) {
                continue;
            }
            let Some(stable_id) = self.store.stable_id(&path) else {
                debug!(path = %path, "skipping file without a stable id");
                continue;
            };
            let type_tag = self.store.type_of(&path);
            files.push(TrackedFile::new(path, stable_id, type_tag));
        }

        info!(entry = %entry, base_path = %base_path, files = files.len(), "resolved entry point");
        Ok(Resolution { files, base_path })
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|ignore| ignore.is_match(path))
    }
}

fn build_globset(patterns: &[String], field: &'static str) -> ReorgResult<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(ReorgError::InvalidInput {
                field,
                reason: "empty_pattern",
                value: Some(pattern.clone()),
            });
        }
        builder.add(
            Glob::new(pattern)
                .map_err(|source_err| ReorgError::glob(field, pattern.clone(), source_err))?,
        );
    }
    Ok(Some(builder.build().map_err(|source_err| {
        ReorgError::glob(field, "<set>".to_string(), source_err)
    })?))
}
