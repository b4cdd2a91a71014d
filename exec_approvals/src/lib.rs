//! # Exec Approvals
//!
//! Core engine for an executable-command approval gate: decides whether a
//! shell command is pre-authorized by a set of user-approved glob patterns,
//! and resolves executable references to concrete filesystem paths the way a
//! shell would.
//!
//! # Modules
//!
//! - [`pattern`] — Glob→regex compilation and the compiled-pattern cache.
//! - [`allowlist`] — Matching a command against an allowlist of patterns.
//! - [`resolve`] — Shell-like executable resolution across cwd and `PATH`.
//! - [`token`] — Quote-aware first-token extraction from a command line.
//! - [`types`] — Wire types (`AllowlistEntry`, `CommandResolution`).
//! - [`error`] — Typed errors for pattern validation and allowlist parsing.
//!
//! Matching fails closed: malformed allowlist JSON and patterns that do not
//! compile are indistinguishable from "did not match". Resolution never
//! fails — an executable that cannot be found comes back without a path.
//!
//! # Example
//!
//! ```rust
//! use exec_approvals::{Allowlist, PatternCache, Resolver, first_token};
//!
//! let cache = PatternCache::new();
//! let allowlist = Allowlist::from_json(r#"[{"pattern": "git *"}]"#).unwrap();
//! assert!(allowlist.matches(&cache, "git status"));
//! assert!(!allowlist.matches(&cache, "rm -rf /"));
//!
//! let executable = first_token("git status --short");
//! let resolution = Resolver::new().resolve(executable, "", "/usr/bin:/bin");
//! assert_eq!(resolution.executable_name, "git");
//! ```

pub mod allowlist;
pub mod error;
pub mod pattern;
pub mod resolve;
pub mod token;
pub mod types;

pub use error::{ApprovalsError, Result};
pub use pattern::PatternCache;
pub use resolve::{Platform, Resolver};
pub use token::first_token;
pub use types::{Allowlist, AllowlistEntry, CommandResolution};
