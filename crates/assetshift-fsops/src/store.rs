//! Filesystem collaborator used by the resolver and the engine.
//!
//! # Design
//! - All paths are root-relative, forward-slash strings.
//! - Batching is a hint: stores may defer index refresh until the outermost
//!   batch closes, with no effect on results.

use tracing::warn;

use crate::error::ReorgResult;

/// Asset storage with stable identifiers and reference queries.
pub trait AssetStore {
    /// Files under `path` (sidecars excluded), optionally recursing into sub-folders.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be traversed.
    fn list_files(&self, path: &str, recursive: bool) -> ReorgResult<Vec<String>>;

    /// Whether a file or folder exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` is a folder.
    fn is_dir(&self, path: &str) -> bool;

    /// Whether the folder at `path` has no entries at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be read.
    fn is_empty_dir(&self, path: &str) -> ReorgResult<bool>;

    /// Create a single folder; its parent must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    fn create_dir(&self, path: &str) -> ReorgResult<()>;

    /// Relocate a file, keeping its stable identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists or the move fails.
    fn move_file(&self, src: &str, dst: &str) -> ReorgResult<()>;

    /// Duplicate a file; the copy receives a fresh stable identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists or the copy fails.
    fn copy_file(&self, src: &str, dst: &str) -> ReorgResult<()>;

    /// Remove a file or folder (and its metadata).
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be removed.
    fn delete(&self, path: &str) -> ReorgResult<()>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_text(&self, path: &str) -> ReorgResult<String>;

    /// Replace a file's text content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_text(&self, path: &str, contents: &str) -> ReorgResult<()>;

    /// Open a batch scope; calls nest.
    fn begin_batch(&self);

    /// Close a batch scope, refreshing the index when the outermost scope closes.
    ///
    /// # Errors
    ///
    /// Returns an error if the deferred refresh fails.
    fn end_batch(&self) -> ReorgResult<()>;

    /// Rebuild the identifier index from metadata already on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be traversed.
    fn refresh(&self) -> ReorgResult<()>;

    /// Transitive set of files referenced by `path`, including `path` itself.
    ///
    /// Files that cannot be read or decoded stay in the set without being scanned.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is missing.
    fn dependencies_of(&self, path: &str) -> ReorgResult<Vec<String>>;

    /// Stable identifier of `path`, when it has one.
    fn stable_id(&self, path: &str) -> Option<String>;

    /// Declared or inferred type tag of `path`.
    fn type_of(&self, path: &str) -> Option<String>;
}

/// RAII batch scope: `begin_batch` on open, `end_batch` on close or drop.
pub struct BatchScope<'a, S: AssetStore + ?Sized> {
    store: &'a S,
    open: bool,
}

impl<'a, S: AssetStore + ?Sized> BatchScope<'a, S> {
    /// Begin a batch on `store`.
    pub fn open(store: &'a S) -> Self {
        store.begin_batch();
        Self { store, open: true }
    }

    /// End the batch, surfacing refresh errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the store's deferred refresh fails.
    pub fn close(mut self) -> ReorgResult<()> {
        self.open = false;
        self.store.end_batch()
    }
}

impl<S: AssetStore + ?Sized> Drop for BatchScope<'_, S> {
    fn drop(&mut self) {
        if self.open
            && let Err(err) = self.store.end_batch()
        {
            warn!(error = %err, "failed to close asset batch");
        }
    }
}
