//! Root-relative, forward-slash path helpers.
//!
//! Every path handled by the engine is a `/`-separated string relative to the
//! project directory (for example `Assets/Foo/a.mat`).

/// Normalize separators and drop empty or `.` segments.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Folder portion of `path`; empty for top-level entries.
#[must_use]
pub fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

/// Final segment of `path`.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rfind('/').map_or(path, |idx| &path[idx + 1..])
}

/// Split a file name into stem and extension (extension keeps its leading dot).
///
/// Dotfiles such as `.gitignore` have no extension.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Join two root-relative fragments.
#[must_use]
pub fn join(base: &str, child: &str) -> String {
    match (base.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base}/{child}"),
    }
}

/// Portion of `path` below `base`, or `None` when `path` is not inside it.
#[must_use]
pub fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    if base.is_empty() {
        return Some(path);
    }
    if path == base {
        return Some("");
    }
    path.strip_prefix(base)?.strip_prefix('/')
}

/// Case-insensitive suffix test used for extension matchers.
#[must_use]
pub fn has_extension(path: &str, extension: &str) -> bool {
    !extension.is_empty()
        && path
            .to_ascii_lowercase()
            .ends_with(&extension.to_ascii_lowercase())
}

/// Folder itself followed by each ancestor, deepest first.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(path), |current| {
        let up = parent(current);
        (!up.is_empty()).then_some(up)
    })
    .filter(|segment| !segment.is_empty())
}
