//! Normalized tag lists.
//!
//! Tags are free-text labels. Two tags are the same tag when they are equal
//! after trimming surrounding whitespace and lowercasing. A [`Tags`] value
//! keeps the first form encountered (trimmed) and drops every later variant
//! and every blank entry.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::BuildHasher;

/// Returns the comparison key for a tag.
#[must_use]
pub fn tag_key(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Ordered, case-insensitively unique list of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    /// Creates an empty tag list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Normalizes free-text tags, preserving the order of first appearance.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskkeeper::task::domain::Tags;
    ///
    /// let tags = Tags::normalize([" Tag ", "tag", "TAG", "", "  "]);
    /// assert_eq!(tags.as_slice(), ["Tag"]);
    /// ```
    #[must_use]
    pub fn normalize<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for candidate in raw {
            let trimmed = candidate.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_lowercase()) {
                tags.push(trimmed.to_owned());
            }
        }
        Self(tags)
    }

    /// Returns the tags in stored order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when no tags are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when any tag's key is in `keys`.
    #[must_use]
    pub fn contains_any<H: BuildHasher>(&self, keys: &HashSet<String, H>) -> bool {
        self.0.iter().any(|tag| keys.contains(&tag_key(tag)))
    }

    /// Iterates over the tags in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for Tags {
    fn from(raw: Vec<String>) -> Self {
        Self::normalize(raw)
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0
    }
}
