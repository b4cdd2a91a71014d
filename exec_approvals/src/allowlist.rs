//! Matching a command line against an allowlist.
//!
//! The boolean result is a pure disjunction over the entries: the command is
//! pre-approved iff at least one pattern matches it in full. Absence of a
//! match is the default-deny state.

use tracing::{Level, instrument};

use crate::pattern::PatternCache;
use crate::types::{Allowlist, AllowlistEntry};

impl Allowlist {
    /// Returns true iff any entry's pattern matches the whole command.
    ///
    /// Patterns are anchored: `git *` matches `git status` but never
    /// `xgit status`. An empty allowlist matches nothing. Entries whose
    /// patterns do not compile are skipped.
    #[instrument(level = Level::TRACE, skip(self, cache))]
    pub fn matches(&self, cache: &PatternCache, command: &str) -> bool {
        self.first_match(cache, command).is_some()
    }

    /// Returns the first entry whose pattern matches the whole command.
    ///
    /// Entries are scanned left to right and the scan stops at the first
    /// hit, so a caller recording usage metadata (`last_used_command`,
    /// `last_resolved_path`) always attributes a command to the same entry.
    #[instrument(level = Level::TRACE, skip(self, cache))]
    pub fn first_match(&self, cache: &PatternCache, command: &str) -> Option<&AllowlistEntry> {
        self.iter()
            .find(|entry| cache.matches(&entry.pattern, command))
    }
}
