//! Regex pattern sets used for path inclusion and exclusion.

use regex::Regex;

use crate::error::{WatchError, WatchResult};

/// A compiled list of regular expressions.
///
/// Matching uses regex search semantics: a pattern matches if it matches
/// anywhere in the path, so `node_modules` excludes every path containing it.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile every pattern, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> WatchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| WatchError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<WatchResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// True if any pattern matches the path
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|r| r.is_match(path))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Source strings of the compiled patterns, in configuration order
    pub fn as_strs(&self) -> Vec<&str> {
        self.patterns.iter().map(Regex::as_str).collect()
    }
}
