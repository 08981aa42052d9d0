//! Directory-backed asset store with `.meta` sidecars.
//!
//! Every asset `X` (file or folder) under the project directory has a sidecar
//! `X.meta` carrying its stable identifier and, optionally, a type tag:
//!
//! ```text
//! fileFormatVersion: 2
//! guid: 0123456789abcdef0123456789abcdef
//! type: Material
//! ```
//!
//! The store keeps an in-memory `guid -> path` index. Moves and copies update
//! it eagerly; a full rebuild runs on `refresh` and when the outermost batch
//! closes after writes. Sidecars are only written for assets the store creates
//! itself, or by an explicit `import_missing`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{ReorgError, ReorgResult};
use crate::paths;
use crate::rewrite::identifier_tokens;
use crate::store::AssetStore;

/// Extension of metadata sidecars.
pub const META_EXTENSION: &str = ".meta";

const GUID_KEY: &str = "guid:";
const TYPE_KEY: &str = "type:";

/// Extension to type-tag table used when a sidecar declares no `type:`.
const INFERRED_TYPES: &[(&str, &str)] = &[
    (".mat", "Material"),
    (".png", "Texture2D"),
    (".jpg", "Texture2D"),
    (".jpeg", "Texture2D"),
    (".tga", "Texture2D"),
    (".psd", "Texture2D"),
    (".tif", "Texture2D"),
    (".tiff", "Texture2D"),
    (".exr", "Texture2D"),
    (".hdr", "Texture2D"),
    (".bmp", "Texture2D"),
    (".gif", "Texture2D"),
    (".rendertexture", "RenderTexture"),
    (".cubemap", "Cubemap"),
    (".anim", "AnimationClip"),
    (".controller", "AnimatorController"),
    (".overridecontroller", "AnimatorOverrideController"),
    (".mask", "AvatarMask"),
    (".fbx", "GameObject"),
    (".obj", "GameObject"),
    (".blend", "GameObject"),
    (".prefab", "GameObject"),
    (".wav", "AudioClip"),
    (".mp3", "AudioClip"),
    (".ogg", "AudioClip"),
    (".aif", "AudioClip"),
    (".aiff", "AudioClip"),
    (".unity", "SceneAsset"),
    (".preset", "Preset"),
    (".shader", "Shader"),
    (".compute", "ComputeShader"),
    (".cs", "MonoScript"),
    (".ttf", "Font"),
    (".otf", "Font"),
    (".physicmaterial", "PhysicMaterial"),
    (".physicsmaterial2d", "PhysicsMaterial2D"),
    (".lighting", "LightingDataAsset"),
    (".asset", "ScriptableObject"),
];

/// Type tag implied by a file extension, if known.
#[must_use]
pub fn infer_type(path: &str) -> Option<&'static str> {
    let (_, extension) = paths::split_extension(paths::file_name(path));
    let extension = extension.to_ascii_lowercase();
    INFERRED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, tag)| *tag)
}

/// Parsed contents of a sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sidecar {
    guid: String,
    type_tag: Option<String>,
}

impl Sidecar {
    fn fresh(type_tag: Option<String>) -> Self {
        Self {
            guid: new_guid(),
            type_tag,
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let mut guid = None;
        let mut type_tag = None;
        for line in text.lines().map(str::trim) {
            if let Some(value) = line.strip_prefix(GUID_KEY) {
                guid = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix(TYPE_KEY) {
                type_tag = Some(value.trim().to_string());
            }
        }
        guid.filter(|value| !value.is_empty())
            .map(|guid| Self { guid, type_tag })
    }

    fn render(&self) -> String {
        let mut out = format!("fileFormatVersion: 2\n{GUID_KEY} {}\n", self.guid);
        if let Some(tag) = &self.type_tag {
            out.push_str(&format!("{TYPE_KEY} {tag}\n"));
        }
        out
    }
}

fn new_guid() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Default)]
struct StoreIndex {
    by_guid: HashMap<String, String>,
    batch_depth: usize,
    pending_refresh: bool,
}

/// Asset store rooted at a project directory.
#[derive(Debug)]
pub struct LocalAssetStore {
    root: PathBuf,
    reference_extensions: Vec<String>,
    index: Mutex<StoreIndex>,
}

impl LocalAssetStore {
    /// Open the project at `root` and index its sidecars.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a directory or cannot be traversed.
    pub fn open(root: impl Into<PathBuf>, reference_extensions: &[String]) -> ReorgResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ReorgError::InvalidInput {
                field: "project",
                reason: "not_a_directory",
                value: Some(root.to_string_lossy().into_owned()),
            });
        }
        let store = Self {
            root,
            reference_extensions: reference_extensions.to_vec(),
            index: Mutex::new(StoreIndex::default()),
        };
        store.rebuild_index()?;
        Ok(store)
    }

    /// Project directory backing the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write sidecars for every asset below `path` that lacks one, then
    /// rebuild the index. `path` itself is left alone.
    ///
    /// Returns the number of assets imported.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be traversed or a sidecar cannot be written.
    pub fn import_missing(&self, path: &str) -> ReorgResult<usize> {
        let scope = paths::normalize(path);
        if !self.is_dir(&scope) {
            return Err(ReorgError::EntryNotFound { path: scope });
        }
        let mut imported = 0usize;
        for path in self.walk_assets(&scope, true, true)? {
            let sidecar_path = self.sidecar_path(&path);
            if sidecar_path.exists() {
                continue;
            }
            let tag = if self.absolute(&path).is_dir() {
                None
            } else {
                infer_type(&path).map(str::to_string)
            };
            write_sidecar(&sidecar_path, &Sidecar::fresh(tag))?;
            debug!(path = %path, "imported asset");
            imported += 1;
        }
        self.rebuild_index()?;
        if imported > 0 {
            info!(imported, scope = %scope, "imported assets without metadata");
        }
        Ok(imported)
    }

    /// Path of the file that currently owns `guid`.
    #[must_use]
    pub fn path_of(&self, guid: &str) -> Option<String> {
        self.lock_index().by_guid.get(guid).cloned()
    }

    fn absolute(&self, path: &str) -> PathBuf {
        let mut absolute = self.root.clone();
        absolute.extend(path.split('/').filter(|segment| !segment.is_empty()));
        absolute
    }

    fn sidecar_path(&self, path: &str) -> PathBuf {
        let mut raw: OsString = self.absolute(path).into_os_string();
        raw.push(META_EXTENSION);
        PathBuf::from(raw)
    }

    fn relative(&self, absolute: &Path) -> Option<String> {
        let relative = absolute.strip_prefix(&self.root).ok()?;
        let joined = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        (!joined.is_empty()).then_some(joined)
    }

    fn read_sidecar(&self, path: &str) -> Option<Sidecar> {
        fs::read_to_string(self.sidecar_path(path))
            .ok()
            .as_deref()
            .and_then(Sidecar::parse)
    }

    /// Assets (not sidecars, not hidden entries) under `path`.
    fn walk_assets(&self, path: &str, recursive: bool, folders: bool) -> ReorgResult<Vec<String>> {
        let start = self.absolute(path);
        let mut walker = WalkDir::new(&start).min_depth(1).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }
        let mut assets = Vec::new();
        for entry in walker.into_iter().filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path())) {
            let entry = entry.map_err(|source| ReorgError::walkdir("walk_assets", &start, source))?;
            if entry.file_type().is_dir() && !folders {
                continue;
            }
            if entry.file_name().to_string_lossy().ends_with(META_EXTENSION) {
                continue;
            }
            if let Some(relative) = self.relative(entry.path()) {
                assets.push(relative);
            }
        }
        Ok(assets)
    }

    fn rebuild_index(&self) -> ReorgResult<()> {
        let mut by_guid = HashMap::new();
        for path in self.walk_assets("", true, true)? {
            if let Some(sidecar) = self.read_sidecar(&path) {
                by_guid.insert(sidecar.guid, path);
            }
        }
        let mut index = self.lock_index();
        index.by_guid = by_guid;
        index.pending_refresh = false;
        Ok(())
    }

    fn note_write(&self) {
        let mut index = self.lock_index();
        if index.batch_depth > 0 {
            index.pending_refresh = true;
        }
    }

    fn ensure_vacant(&self, dst: &str) -> ReorgResult<()> {
        if self.absolute(dst).exists() {
            return Err(ReorgError::AlreadyExists {
                path: dst.to_string(),
            });
        }
        Ok(())
    }

    fn lock_index(&self) -> MutexGuard<'_, StoreIndex> {
        match self.index.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("asset index mutex poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }
}

impl AssetStore for LocalAssetStore {
    fn list_files(&self, path: &str, recursive: bool) -> ReorgResult<Vec<String>> {
        self.walk_assets(path, recursive, false)
    }

    fn exists(&self, path: &str) -> bool {
        self.absolute(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.absolute(path).is_dir()
    }

    fn is_empty_dir(&self, path: &str) -> ReorgResult<bool> {
        let absolute = self.absolute(path);
        let mut entries = fs::read_dir(&absolute)
            .map_err(|source| ReorgError::io("is_empty_dir", &absolute, source))?;
        Ok(entries.next().is_none())
    }

    fn create_dir(&self, path: &str) -> ReorgResult<()> {
        let absolute = self.absolute(path);
        fs::create_dir(&absolute).map_err(|source| ReorgError::io("create_dir", &absolute, source))?;
        let sidecar = Sidecar::fresh(None);
        write_sidecar(&self.sidecar_path(path), &sidecar)?;
        self.lock_index().by_guid.insert(sidecar.guid, path.to_string());
        self.note_write();
        Ok(())
    }

    fn move_file(&self, src: &str, dst: &str) -> ReorgResult<()> {
        self.ensure_vacant(dst)?;
        let from = self.absolute(src);
        let to = self.absolute(dst);
        fs::rename(&from, &to).map_err(|source| ReorgError::io("move_file", &from, source))?;

        let from_meta = self.sidecar_path(src);
        if from_meta.exists() {
            let to_meta = self.sidecar_path(dst);
            fs::rename(&from_meta, &to_meta)
                .map_err(|source| ReorgError::io("move_file.sidecar", &from_meta, source))?;
        }
        if let Some(sidecar) = self.read_sidecar(dst) {
            self.lock_index().by_guid.insert(sidecar.guid, dst.to_string());
        }
        self.note_write();
        Ok(())
    }

    fn copy_file(&self, src: &str, dst: &str) -> ReorgResult<()> {
        self.ensure_vacant(dst)?;
        let from = self.absolute(src);
        let to = self.absolute(dst);
        fs::copy(&from, &to).map_err(|source| ReorgError::io("copy_file", &from, source))?;

        let tag = self
            .read_sidecar(src)
            .and_then(|sidecar| sidecar.type_tag);
        let sidecar = Sidecar::fresh(tag);
        write_sidecar(&self.sidecar_path(dst), &sidecar)?;
        self.lock_index().by_guid.insert(sidecar.guid, dst.to_string());
        self.note_write();
        Ok(())
    }

    fn delete(&self, path: &str) -> ReorgResult<()> {
        let absolute = self.absolute(path);
        if absolute.is_dir() {
            fs::remove_dir_all(&absolute)
                .map_err(|source| ReorgError::io("delete.dir", &absolute, source))?;
        } else {
            fs::remove_file(&absolute)
                .map_err(|source| ReorgError::io("delete.file", &absolute, source))?;
        }
        let sidecar = self.sidecar_path(path);
        if sidecar.exists() {
            fs::remove_file(&sidecar)
                .map_err(|source| ReorgError::io("delete.sidecar", &sidecar, source))?;
        }
        let nested = format!("{path}/");
        self.lock_index()
            .by_guid
            .retain(|_, owner| owner != path && !owner.starts_with(&nested));
        self.note_write();
        Ok(())
    }

    fn read_text(&self, path: &str) -> ReorgResult<String> {
        let absolute = self.absolute(path);
        fs::read_to_string(&absolute).map_err(|source| ReorgError::io("read_text", &absolute, source))
    }

    fn write_text(&self, path: &str, contents: &str) -> ReorgResult<()> {
        let absolute = self.absolute(path);
        fs::write(&absolute, contents)
            .map_err(|source| ReorgError::io("write_text", &absolute, source))?;
        self.note_write();
        Ok(())
    }

    fn begin_batch(&self) {
        self.lock_index().batch_depth += 1;
    }

    fn end_batch(&self) -> ReorgResult<()> {
        let refresh = {
            let mut index = self.lock_index();
            index.batch_depth = index.batch_depth.saturating_sub(1);
            index.batch_depth == 0 && index.pending_refresh
        };
        if refresh {
            self.refresh()?;
        }
        Ok(())
    }

    fn refresh(&self) -> ReorgResult<()> {
        self.rebuild_index()
    }

    fn dependencies_of(&self, path: &str) -> ReorgResult<Vec<String>> {
        let entry = paths::normalize(path);
        if !self.exists(&entry) {
            return Err(ReorgError::EntryNotFound { path: entry });
        }

        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue = VecDeque::from([entry]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            ordered.push(current.clone());

            let bearing = self
                .reference_extensions
                .iter()
                .any(|ext| paths::has_extension(&current, ext));
            if !bearing || self.is_dir(&current) {
                continue;
            }
            let absolute = self.absolute(&current);
            let bytes = match fs::read(&absolute) {
                Ok(bytes) => bytes,
                Err(err) => {
                    debug!(path = %current, error = %err, "reference scan skipped unreadable file");
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&bytes);
            let index = self.lock_index();
            for token in identifier_tokens(&text) {
                if let Some(target) = index.by_guid.get(token)
                    && !seen.contains(target)
                    && !self.is_dir(target)
                {
                    queue.push_back(target.clone());
                }
            }
        }
        Ok(ordered)
    }

    fn stable_id(&self, path: &str) -> Option<String> {
        self.read_sidecar(path).map(|sidecar| sidecar.guid)
    }

    fn type_of(&self, path: &str) -> Option<String> {
        self.read_sidecar(path)
            .and_then(|sidecar| sidecar.type_tag)
            .or_else(|| infer_type(path).map(str::to_string))
    }
}

fn write_sidecar(path: &Path, sidecar: &Sidecar) -> ReorgResult<()> {
    fs::write(path, sidecar.render()).map_err(|source| ReorgError::io("write_sidecar", path, source))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    type TestResult<T> = Result<T>;

    fn reference_extensions() -> Vec<String> {
        vec![".mat".into(), ".prefab".into()]
    }

    fn write_asset(root: &Path, path: &str, guid: &str, tag: Option<&str>, body: &str) -> TestResult<()> {
        let absolute = root.join(path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&absolute, body)?;
        let sidecar = Sidecar {
            guid: guid.to_string(),
            type_tag: tag.map(str::to_string),
        };
        fs::write(root.join(format!("{path}.meta")), sidecar.render())?;
        Ok(())
    }

    #[test]
    fn sidecar_round_trips_guid_and_type() {
        let parsed = Sidecar::parse("fileFormatVersion: 2\nguid: abc\ntype: Material\n");
        assert_eq!(
            parsed,
            Some(Sidecar {
                guid: "abc".into(),
                type_tag: Some("Material".into())
            })
        );
        assert!(Sidecar::parse("fileFormatVersion: 2\n").is_none());
        assert!(Sidecar::parse("guid:   \n").is_none());
    }

    #[test]
    fn infer_type_uses_extension_table() {
        assert_eq!(infer_type("Assets/a.MAT"), Some("Material"));
        assert_eq!(infer_type("Assets/b.png"), Some("Texture2D"));
        assert_eq!(infer_type("Assets/readme"), None);
    }

    #[test]
    fn list_files_skips_sidecars_and_hidden_entries() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/Foo/a.mat", "aaa", None, "")?;
        write_asset(temp.path(), "Assets/Foo/Sub/b.png", "bbb", None, "")?;
        fs::write(temp.path().join("Assets/Foo/.DS_Store"), "")?;

        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;
        assert_eq!(
            store.list_files("Assets/Foo", true)?,
            vec!["Assets/Foo/Sub/b.png".to_string(), "Assets/Foo/a.mat".to_string()]
        );
        assert_eq!(store.list_files("Assets/Foo", false)?, vec!["Assets/Foo/a.mat".to_string()]);
        Ok(())
    }

    #[test]
    fn copy_assigns_fresh_guid_and_keeps_type() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/a.mat", "aaa", Some("Material"), "body")?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        store.copy_file("Assets/a.mat", "Assets/a_copy.mat")?;
        let copy_id = store.stable_id("Assets/a_copy.mat").expect("copy has guid");
        assert_ne!(copy_id, "aaa");
        assert_eq!(store.type_of("Assets/a_copy.mat").as_deref(), Some("Material"));
        assert_eq!(store.path_of(&copy_id).as_deref(), Some("Assets/a_copy.mat"));
        assert_eq!(store.read_text("Assets/a_copy.mat")?, "body");

        let err = store.copy_file("Assets/a.mat", "Assets/a_copy.mat");
        assert!(matches!(err, Err(ReorgError::AlreadyExists { .. })));
        Ok(())
    }

    #[test]
    fn move_carries_sidecar_and_index_entry() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/a.mat", "aaa", None, "")?;
        fs::create_dir_all(temp.path().join("Assets/Out"))?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        store.move_file("Assets/a.mat", "Assets/Out/a.mat")?;
        assert!(!temp.path().join("Assets/a.mat.meta").exists());
        assert_eq!(store.stable_id("Assets/Out/a.mat").as_deref(), Some("aaa"));
        assert_eq!(store.path_of("aaa").as_deref(), Some("Assets/Out/a.mat"));
        Ok(())
    }

    #[test]
    fn delete_folder_removes_its_sidecar() -> TestResult<()> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("Assets"))?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        store.create_dir("Assets/Empty")?;
        assert!(temp.path().join("Assets/Empty.meta").exists());
        assert!(store.is_empty_dir("Assets/Empty")?);
        store.delete("Assets/Empty")?;
        assert!(!store.exists("Assets/Empty"));
        assert!(!temp.path().join("Assets/Empty.meta").exists());
        Ok(())
    }

    #[test]
    fn dependencies_follow_references_transitively() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/p.prefab", "ppp", None, "mat: {guid: mmm}")?;
        write_asset(temp.path(), "Assets/m.mat", "mmm", None, "tex: {guid: ttt}\nloop: {guid: ppp}")?;
        write_asset(temp.path(), "Assets/t.png", "ttt", None, "")?;
        write_asset(temp.path(), "Assets/unrelated.png", "uuu", None, "")?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        let deps = store.dependencies_of("Assets/p.prefab")?;
        assert_eq!(deps, vec!["Assets/p.prefab", "Assets/m.mat", "Assets/t.png"]);

        let missing = store.dependencies_of("Assets/none.prefab");
        assert!(matches!(missing, Err(ReorgError::EntryNotFound { .. })));
        Ok(())
    }

    #[test]
    fn import_writes_missing_sidecars_once() -> TestResult<()> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("Assets/Foo"))?;
        fs::write(temp.path().join("Assets/Foo/a.mat"), "")?;
        fs::create_dir_all(temp.path().join("Library"))?;
        fs::write(temp.path().join("Library/cache.bin"), "")?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;
        assert!(store.stable_id("Assets/Foo/a.mat").is_none());

        assert_eq!(store.import_missing("Assets")?, 2);
        assert_eq!(store.import_missing("Assets")?, 0);
        let guid = store.stable_id("Assets/Foo/a.mat").expect("imported guid");
        assert_eq!(guid.len(), 32);
        assert_eq!(store.type_of("Assets/Foo/a.mat").as_deref(), Some("Material"));
        assert!(temp.path().join("Assets/Foo.meta").exists());
        assert!(!temp.path().join("Assets.meta").exists());
        assert!(!temp.path().join("Library/cache.bin.meta").exists());

        let missing = store.import_missing("Missing");
        assert!(matches!(missing, Err(ReorgError::EntryNotFound { .. })));
        Ok(())
    }

    #[test]
    fn batch_defers_refresh_until_outermost_close() -> TestResult<()> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("Assets"))?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        store.begin_batch();
        store.begin_batch();
        write_asset(temp.path(), "Assets/new.mat", "nnn", None, "")?;
        store.write_text("Assets/new.mat", "x")?;
        store.end_batch()?;
        assert!(store.path_of("nnn").is_none());
        store.end_batch()?;
        assert_eq!(store.path_of("nnn").as_deref(), Some("Assets/new.mat"));
        Ok(())
    }

    #[test]
    fn refresh_never_writes_sidecars() -> TestResult<()> {
        let temp = TempDir::new()?;
        fs::create_dir_all(temp.path().join("Assets"))?;
        fs::write(temp.path().join("Assets/loose.png"), "")?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        store.refresh()?;
        assert!(!temp.path().join("Assets/loose.png.meta").exists());
        assert!(!temp.path().join("Assets.meta").exists());
        Ok(())
    }

    #[test]
    fn binary_references_stay_in_the_closure_unscanned() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/Scene/main.prefab", "sss", None, "light: {guid: lll}")?;
        write_asset(temp.path(), "Assets/Scene/LightingData.mat", "lll", None, "")?;
        fs::write(temp.path().join("Assets/Scene/LightingData.mat"), [0xff_u8, 0xfe, 0x00, 0x81])?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        let deps = store.dependencies_of("Assets/Scene/main.prefab")?;
        assert_eq!(deps, vec!["Assets/Scene/main.prefab", "Assets/Scene/LightingData.mat"]);
        Ok(())
    }

    #[test]
    fn lossy_decoding_still_finds_references() -> TestResult<()> {
        let temp = TempDir::new()?;
        write_asset(temp.path(), "Assets/t.png", "ttt", None, "")?;
        write_asset(temp.path(), "Assets/m.mat", "mmm", None, "")?;
        let mut body = vec![0xff_u8, 0xfe];
        body.extend_from_slice(b"\ntex: {guid: ttt}\n");
        fs::write(temp.path().join("Assets/m.mat"), body)?;
        let store = LocalAssetStore::open(temp.path(), &reference_extensions())?;

        assert_eq!(store.dependencies_of("Assets/m.mat")?, vec!["Assets/m.mat", "Assets/t.png"]);
        Ok(())
    }
}
