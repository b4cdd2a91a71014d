//! Glob pattern compilation and the compiled-pattern cache.
//!
//! Allow patterns are shell-style globs restricted to two metacharacters:
//! `*` (any run of zero or more characters) and `?` (exactly one character).
//! Everything else is literal, including regex metacharacters. A pattern is
//! translated to an anchored regular expression so the whole command must
//! match, never a substring, and the compiled form is memoized keyed by the
//! original pattern string.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use regex::Regex;
use tracing::{Level, instrument, warn};

use crate::error::{ApprovalsError, Result};

/// Translates a glob pattern into anchored regular expression source.
///
/// The trimmed pattern is escaped wholesale and the escaped wildcards are
/// substituted back, so a literal `.` or `(` in the pattern stays literal.
fn translate(pattern: &str) -> String {
    let body = regex::escape(pattern.trim())
        .replace(r"\?", ".")
        .replace(r"\*", ".*");
    format!("^{}$", body)
}

/// Compiles a glob pattern, surfacing the failure for diagnostics.
///
/// Callers that store user-authored patterns should validate them here
/// before persisting. The matching path goes through [`PatternCache`],
/// which swallows the error and treats a bad pattern as "matches nothing".
#[instrument(level = Level::TRACE)]
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&translate(pattern)).map_err(|source| ApprovalsError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Memoizing compiler for glob patterns.
///
/// Keys are the original, untranslated pattern strings. Entries are never
/// evicted; the cache lives as long as its owner, so a long-running service
/// should scope one per unit of work rather than holding it globally.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled matcher for `pattern`, compiling on first use.
    ///
    /// A pattern that does not compile yields `None` and never matches
    /// anything. Lookups only take the read lock; a miss compiles outside
    /// any lock and then inserts under a brief write lock. Two callers
    /// racing on the same miss both compile, and whichever inserts first
    /// wins — the compiled forms are identical.
    #[instrument(level = Level::TRACE, skip(self))]
    pub fn compiled(&self, pattern: &str) -> Option<Arc<Regex>> {
        if let Some(re) = self.read_guard().get(pattern) {
            return Some(Arc::clone(re));
        }

        let re = match compile(pattern) {
            Ok(re) => Arc::new(re),
            Err(error) => {
                warn!(pattern, %error, "allow pattern does not compile, treating as no match");
                return None;
            }
        };

        let mut map = self
            .compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Some(Arc::clone(map.entry(pattern.to_string()).or_insert(re)))
    }

    /// Returns true if `command` matches `pattern` in its entirety.
    #[instrument(level = Level::TRACE, skip(self))]
    pub fn matches(&self, pattern: &str, command: &str) -> bool {
        self.compiled(pattern)
            .map(|re| re.is_match(command))
            .unwrap_or(false)
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Regex>>> {
        // Entries are pure values, so a poisoned lock is still usable.
        self.compiled.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_anchors_and_substitutes() {
        assert_eq!(translate("git *"), "^git .*$");
        assert_eq!(translate("a?c"), "^a.c$");
        assert_eq!(translate("echo ."), r"^echo \.$");
        assert_eq!(translate("  git *  "), "^git .*$");
    }

    #[test]
    fn test_star_matches_any_run_including_empty() {
        let cache = PatternCache::new();
        assert!(cache.matches("git *", "git status"));
        assert!(cache.matches("git *", "git log --oneline"));
        assert!(cache.matches("git *", "git "));
        assert!(!cache.matches("git *", "gitstatus"));
    }

    #[test]
    fn test_full_match_is_anchored() {
        let cache = PatternCache::new();
        assert!(cache.matches("git status", "git status"));
        assert!(!cache.matches("git status", "git status --verbose"));
        assert!(!cache.matches("git status", "xgit status"));
    }

    #[test]
    fn test_question_mark_matches_exactly_one_character() {
        let cache = PatternCache::new();
        assert!(cache.matches("ls -?", "ls -l"));
        assert!(!cache.matches("ls -?", "ls -"));
        assert!(!cache.matches("ls -?", "ls -la"));
    }

    #[test]
    fn test_regex_metacharacters_stay_literal() {
        let cache = PatternCache::new();
        assert!(cache.matches("echo $(date)", "echo $(date)"));
        assert!(!cache.matches("echo .", "echo x"));
        assert!(cache.matches("grep a+b", "grep a+b"));
        assert!(!cache.matches("grep a+b", "grep aab"));
        assert!(cache.matches("rm [old]", "rm [old]"));
    }

    #[test]
    fn test_cached_and_uncached_results_agree() {
        let warm = PatternCache::new();
        assert!(warm.matches("npm run *", "npm run build"));
        // Second call hits the cache.
        assert!(warm.matches("npm run *", "npm run build"));
        assert!(!warm.matches("npm run *", "cargo build"));

        let cold = PatternCache::new();
        assert!(cold.matches("npm run *", "npm run build"));
        assert!(!cold.matches("npm run *", "cargo build"));
    }

    #[test]
    fn test_compile_accepts_ordinary_patterns() {
        assert!(compile("git *").is_ok());
        assert!(compile("").is_ok());
        assert!(compile("???").is_ok());
    }

    #[test]
    fn test_empty_pattern_matches_only_empty_command() {
        let cache = PatternCache::new();
        assert!(cache.matches("", ""));
        assert!(!cache.matches("", "ls"));
    }

    #[test]
    fn test_concurrent_lookups_share_one_cache() {
        let cache = PatternCache::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        assert!(cache.matches("git *", "git status"));
                        assert!(!cache.matches("docker *", "git status"));
                    }
                });
            }
        });
    }
}
