//! Temporary asset projects for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use uuid::Uuid;

/// A throwaway project directory with an `Assets` root.
///
/// Assets are written together with a `.meta` sidecar carrying a fresh
/// `guid:` and an optional `type:` line. The directory is removed on drop.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty project containing only `Assets/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("assetshift-")
            .tempdir()
            .context("failed to create project fixture")?;
        fs::create_dir_all(dir.path().join("Assets")).context("failed to create Assets root")?;
        Ok(Self { dir })
    }

    /// Project directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a root-relative `path`.
    #[must_use]
    pub fn path(&self, path: &str) -> PathBuf {
        self.dir.path().join(path)
    }

    /// Write an asset and its sidecar, returning the generated guid.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset or sidecar cannot be written.
    pub fn write_asset(&self, path: &str, type_tag: Option<&str>, contents: &str) -> Result<String> {
        let guid = Uuid::new_v4().simple().to_string();
        self.write_asset_with_guid(path, &guid, type_tag, contents)?;
        Ok(guid)
    }

    /// Write an asset with a caller-chosen guid.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset or sidecar cannot be written.
    pub fn write_asset_with_guid(
        &self,
        path: &str,
        guid: &str,
        type_tag: Option<&str>,
        contents: &str,
    ) -> Result<()> {
        let absolute = self.path(path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&absolute, contents)
            .with_context(|| format!("failed to write {}", absolute.display()))?;

        let mut sidecar = format!("fileFormatVersion: 2\nguid: {guid}\n");
        if let Some(tag) = type_tag {
            sidecar.push_str("type: ");
            sidecar.push_str(tag);
            sidecar.push('\n');
        }
        let meta = self.path(&format!("{path}.meta"));
        fs::write(&meta, sidecar).with_context(|| format!("failed to write {}", meta.display()))
    }

    /// Create a plain folder (no sidecar).
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    pub fn create_dir(&self, path: &str) -> Result<()> {
        let absolute = self.path(path);
        fs::create_dir_all(&absolute)
            .with_context(|| format!("failed to create {}", absolute.display()))
    }

    /// Read a root-relative file as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, path: &str) -> Result<String> {
        let absolute = self.path(path);
        fs::read_to_string(&absolute).with_context(|| format!("failed to read {}", absolute.display()))
    }

    /// Whether a root-relative file or folder exists.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.path(path).exists()
    }

    /// The `guid:` recorded in a root-relative asset's sidecar.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar is missing or has no guid line.
    pub fn guid_of(&self, path: &str) -> Result<String> {
        let sidecar = self.read(&format!("{path}.meta"))?;
        sidecar
            .lines()
            .find_map(|line| line.trim().strip_prefix("guid:"))
            .map(|value| value.trim().to_string())
            .with_context(|| format!("no guid in sidecar for {path}"))
    }
}
