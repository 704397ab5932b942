//! Canonical template names.
//!
//! The engine never talks to the wiki itself; whoever drives it supplies a
//! [`CanonicalResolver`]. [`TableResolver`] is the in-memory implementation
//! used by tests and, refilled for every page, by the bot.

use std::collections::HashMap;

use thiserror::Error;

use crate::wikitext::normalize_title;

const TEMPLATE_NAMESPACE: &str = "Template:";

/// Redirect hops followed before giving up on a chain.
pub const MAX_REDIRECT_HOPS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid title: {0:?}")]
    InvalidTitle(String),
}

/// Follows redirects from a full page title to the page it finally names.
///
/// A title with no page behind it resolves to itself; only malformed titles
/// are errors.
pub trait CanonicalResolver {
    fn resolve(&self, title: &str) -> Result<String, ResolveError>;
}

/// Full `Template:` title for a template name as written on a page.
pub fn template_title(name: &str) -> String {
    let name = name.trim();
    let bare = match name.get(..TEMPLATE_NAMESPACE.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(TEMPLATE_NAMESPACE) => {
            &name[TEMPLATE_NAMESPACE.len()..]
        }
        _ => name,
    };
    format!("{TEMPLATE_NAMESPACE}{}", normalize_title(bare))
}

/// Parser functions such as `{{#if:...}}` are not template transclusions.
pub fn is_parser_function(name: &str) -> bool {
    name.trim_start().starts_with('#')
}

/// Normalise a full title, including the part after a `Template:` prefix.
pub fn normalize_page_title(title: &str) -> String {
    let trimmed = title.trim();
    match trimmed.get(..TEMPLATE_NAMESPACE.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(TEMPLATE_NAMESPACE) => template_title(trimmed),
        _ => normalize_title(trimmed),
    }
}

/// Reject titles MediaWiki could never store.
pub fn validate_title(title: &str) -> Result<(), ResolveError> {
    let bare = title
        .trim()
        .strip_prefix(TEMPLATE_NAMESPACE)
        .unwrap_or(title.trim());
    if bare.trim().is_empty()
        || title
            .chars()
            .any(|c| matches!(c, '[' | ']' | '{' | '}' | '<' | '>' | '|' | '#') || c.is_control())
    {
        return Err(ResolveError::InvalidTitle(title.to_string()));
    }
    Ok(())
}

/// Redirect table keyed by normalised title.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
    redirects: HashMap<String, String>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut resolver = Self::new();
        for (from, to) in pairs {
            resolver.insert(from, to);
        }
        resolver
    }

    /// Record that `from` redirects (or normalises) to `to`.
    pub fn insert(&mut self, from: &str, to: &str) {
        let from = normalize_page_title(from);
        let to = normalize_page_title(to);
        if from != to {
            self.redirects.insert(from, to);
        }
    }

    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }
}

impl CanonicalResolver for TableResolver {
    fn resolve(&self, title: &str) -> Result<String, ResolveError> {
        validate_title(title)?;
        let mut current = normalize_page_title(title);
        for _ in 0..MAX_REDIRECT_HOPS {
            match self.redirects.get(&current) {
                Some(next) => current = next.clone(),
                None => break,
            }
        }
        Ok(current)
    }
}
