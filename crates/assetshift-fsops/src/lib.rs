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
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Dependency-aware asset reorganization.
//!
//! Layout: `store.rs` (filesystem collaborator trait), `local.rs` (sidecar-backed
//! store), `classify.rs`, `resolve.rs`, `assign.rs` (planning), `layout.rs`
//! (destination paths), `rewrite.rs` (identifier substitution), `service.rs`
//! (the commit engine), `model/` (plan and report types).

pub mod assign;
pub mod classify;
pub mod error;
pub mod layout;
pub mod local;
pub mod model;
pub mod paths;
pub mod resolve;
pub mod rewrite;
pub mod service;
pub mod store;

pub use assign::assign;
pub use classify::classify;
pub use error::{ReorgError, ReorgResult};
pub use local::{LocalAssetStore, META_EXTENSION, infer_type};
pub use model::{
    CommitOptions, FailureKind, FileFailure, LayoutMode, Plan, PlannedTransfer, Report,
    Resolution, RunContext, TrackedFile, TransferRecord, Worklist,
};
pub use resolve::Resolver;
pub use rewrite::{IdentifierRemap, replace_identifiers};
pub use service::{CommitRequest, ReorgService, cleanup_empty_folders};
pub use store::{AssetStore, BatchScope};
