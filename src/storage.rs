/// Ordered, unique list of target-site patterns as stored in chrome.storage.sync

use crate::error::SiteListError;
use serde::{Deserialize, Serialize};

/// Canonical form of a pattern: trimmed and lower-cased. `None` when blank.
pub fn normalize_pattern(raw: &str) -> Option<String> {
    let pattern = raw.trim().to_lowercase();
    if pattern.is_empty() {
        None
    } else {
        Some(pattern)
    }
}

/// Serialized as a bare string array, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteList {
    sites: Vec<String>,
}

impl SiteList {
    pub fn new() -> Self {
        SiteList { sites: Vec::new() }
    }

    /// Build from arbitrary input: blanks dropped, duplicates keep their first position
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = SiteList::new();
        for pattern in raw.into_iter().filter_map(|s| normalize_pattern(s.as_ref())) {
            if !list.contains(&pattern) {
                list.sites.push(pattern);
            }
        }
        list
    }

    pub fn add(&mut self, raw: &str) -> Result<String, SiteListError> {
        let pattern = normalize_pattern(raw).ok_or(SiteListError::Empty)?;
        if self.contains(&pattern) {
            return Err(SiteListError::Duplicate(pattern));
        }
        self.sites.push(pattern.clone());
        Ok(pattern)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.sites.len() {
            Some(self.sites.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.sites.iter().any(|s| s == pattern)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
