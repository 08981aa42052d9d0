//! Command handlers grouped by concern.

pub(crate) mod import;
pub(crate) mod reorganize;
pub(crate) mod settings;
