//! Cache key composition.
//!
//! Keys take the form `<siteId>:content:<sectionId>` for single sections and
//! `<siteId>:batch:<ids>` for batches, where `<ids>` is the sorted,
//! de-duplicated, comma-joined id set.

use std::fmt;

/// Logical cache key, before site scoping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Content(String),
    Batch(Vec<String>),
}

impl CacheKey {
    /// Build a batch key from ids in any order, duplicates allowed.
    pub fn batch<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        ids.sort();
        ids.dedup();
        CacheKey::Batch(ids)
    }

    /// Full key scoped to `site_id`.
    pub fn scoped(&self, site_id: &str) -> String {
        format!("{}{}", site_prefix(site_id), self)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Content(id) => write!(f, "content:{id}"),
            CacheKey::Batch(ids) => write!(f, "batch:{}", ids.join(",")),
        }
    }
}

/// Prefix shared by every key belonging to `site_id`.
pub fn site_prefix(site_id: &str) -> String {
    format!("{site_id}:")
}

/// Scoped key for a single section.
pub fn content_key(site_id: &str, section_id: &str) -> String {
    CacheKey::Content(section_id.to_string()).scoped(site_id)
}

/// Scoped key for a set of sections.
pub fn batch_key<S: AsRef<str>>(site_id: &str, section_ids: &[S]) -> String {
    CacheKey::batch(section_ids).scoped(site_id)
}
