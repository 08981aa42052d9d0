//! Whole-token identifier scanning and substitution.
//!
//! A token is a maximal run of ASCII alphanumerics and `_`. Substitution only
//! replaces tokens that equal a remapped identifier exactly, so an identifier
//! that happens to be a substring of a longer token is never touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Old to new stable identifiers recorded while copies are made.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct IdentifierRemap(BTreeMap<String, String>);

impl IdentifierRemap {
    /// Record that `old` now has a copy identified by `new`.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.0.insert(old.into(), new.into());
    }

    /// Replacement for `old`, if any.
    #[must_use]
    pub fn get(&self, old: &str) -> Option<&str> {
        self.0.get(old).map(String::as_str)
    }

    /// Number of recorded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pairs were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(old, new)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }
}

const fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Iterate the whole tokens of `text`.
pub fn identifier_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
}

/// Replace every whole-token occurrence of a remapped identifier.
///
/// Returns the rewritten text and the substitution count, or `None` when
/// nothing matched so callers can leave the file untouched.
#[must_use]
pub fn replace_identifiers(text: &str, remap: &IdentifierRemap) -> Option<(String, usize)> {
    if remap.is_empty() {
        return None;
    }

    let mut output = String::with_capacity(text.len());
    let mut replaced = 0usize;
    let mut token_start: Option<usize> = None;

    let mut flush = |output: &mut String, token: &str| match remap.get(token) {
        Some(new) => {
            output.push_str(new);
            replaced += 1;
        }
        None => output.push_str(token),
    };

    for (idx, c) in text.char_indices() {
        if is_token_char(c) {
            token_start.get_or_insert(idx);
        } else {
            if let Some(start) = token_start.take() {
                flush(&mut output, &text[start..idx]);
            }
            output.push(c);
        }
    }
    if let Some(start) = token_start {
        flush(&mut output, &text[start..]);
    }

    (replaced > 0).then_some((output, replaced))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &str = "0123456789abcdef0123456789abcdef";
    const NEW: &str = "fedcba9876543210fedcba9876543210";

    fn remap() -> IdentifierRemap {
        let mut remap = IdentifierRemap::default();
        remap.insert(OLD, NEW);
        remap
    }

    #[test]
    fn replaces_every_whole_token_occurrence() {
        let text = format!(
            "m_Texture: {{fileID: 2800000, guid: {OLD}, type: 3}}\n  other: {{guid: {OLD}}}\n"
        );
        let (rewritten, count) = replace_identifiers(&text, &remap()).expect("rewritten");
        assert_eq!(count, 2);
        assert!(!rewritten.contains(OLD));
        assert_eq!(rewritten.matches(NEW).count(), 2);
        assert_eq!(rewritten.len(), text.len());
    }

    #[test]
    fn leaves_partial_tokens_alone() {
        let text = format!("guid: {OLD}ff\nguid: x_{OLD}\nguid: {OLD}");
        let (rewritten, count) = replace_identifiers(&text, &remap()).expect("rewritten");
        assert_eq!(count, 1);
        assert!(rewritten.contains(&format!("{OLD}ff")));
        assert!(rewritten.contains(&format!("x_{OLD}")));
        assert!(rewritten.ends_with(NEW));
    }

    #[test]
    fn unmatched_text_reports_none() {
        assert!(replace_identifiers("guid: 42\n", &remap()).is_none());
        assert!(replace_identifiers(OLD, &IdentifierRemap::default()).is_none());
    }

    #[test]
    fn preserves_non_ascii_content() {
        let text = format!("name: Größe\nguid: {OLD}\n");
        let (rewritten, _) = replace_identifiers(&text, &remap()).expect("rewritten");
        assert!(rewritten.starts_with("name: Größe\n"));
    }

    #[test]
    fn tokens_split_on_punctuation() {
        let tokens: Vec<&str> = identifier_tokens("{guid: ab_1, type: 3}").collect();
        assert_eq!(tokens, vec!["guid", "ab_1", "type", "3"]);
    }
}
