// src/watch/filter.rs

use std::fmt;

use regex::Regex;

/// Classifies changed file paths as watched or ignored.
///
/// Holds two ordered rule lists compiled from regular-expression patterns.
/// Classification is pure: for a fixed rule set the same path always
/// produces the same answer, and `is_watched` / `is_ignored` are independent
/// of call order.
///
/// A pattern that fails to compile occupies a dead slot that never matches,
/// so one bad rule cannot take down the pipeline. Startup validation
/// ([`crate::config::validate_config`]) normally rejects such patterns
/// before a filter is ever built from them.
#[derive(Clone)]
pub struct PathFilter {
    watch: Vec<Option<Regex>>,
    ignore: Vec<Option<Regex>>,
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFilter")
            .field("watch_rules", &self.watch.len())
            .field("ignore_rules", &self.ignore.len())
            .finish()
    }
}

impl PathFilter {
    /// Build a filter from raw patterns.
    ///
    /// Invalid patterns are kept as non-matching slots rather than reported;
    /// callers that want hard errors validate the pattern lists first.
    pub fn new(watch: &[String], ignore: &[String]) -> Self {
        Self {
            watch: compile_lenient(watch),
            ignore: compile_lenient(ignore),
        }
    }

    /// Does any ignore rule match this path?
    pub fn is_ignored(&self, path: &str) -> bool {
        matches_any(&self.ignore, path)
    }

    /// Does any watch rule match this path?
    pub fn is_watched(&self, path: &str) -> bool {
        matches_any(&self.watch, path)
    }

    /// A path qualifies for action iff it is watched and not ignored.
    ///
    /// Exclusion wins: a path matching an ignore rule is never actioned,
    /// even when it also matches a watch rule.
    pub fn qualifies(&self, path: &str) -> bool {
        !self.is_ignored(path) && self.is_watched(path)
    }
}

fn compile_lenient(patterns: &[String]) -> Vec<Option<Regex>> {
    patterns.iter().map(|p| Regex::new(p).ok()).collect()
}

fn matches_any(rules: &[Option<Regex>], path: &str) -> bool {
    rules
        .iter()
        .flatten()
        .any(|re| re.is_match(path))
}
