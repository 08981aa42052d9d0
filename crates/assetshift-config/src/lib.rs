#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-backed organizer settings: rule tables, options, and their persistence.
//!
//! Layout: `model.rs` (typed settings and rule tables), `defaults.rs` (built-in
//! tables), `validate.rs` (validation helpers), `loader.rs` (JSON load/save).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{LoadedSettings, SETTINGS_FILE_NAME, load_or_init, load_settings, save_settings};
pub use model::{
    Classification, ConfigWarning, FileAction, FolderRule, OTHER_CLASSIFICATION,
    OrganizerSettings, SortKey, TypeHierarchy,
};
pub use validate::validate_settings;
