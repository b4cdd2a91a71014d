//! Shell-like executable resolution.
//!
//! Maps a raw executable reference (bare name, relative path, absolute path,
//! or `~/`-prefixed path) to a concrete filesystem path using the lookup
//! order a shell applies: explicit path references first, then each entry of
//! the `PATH` string in order. Resolution failure is a normal outcome, not an
//! error — shell builtins and transiently installed executables simply come
//! back unresolved.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{Level, instrument};

use crate::types::CommandResolution;

/// Platform-specific lookup parameters: the `PATH` list separator and the
/// ordered executable-extension list tried for extensionless references.
///
/// Keeping these as data keeps the resolver algorithm platform-agnostic;
/// tests supply fake strategies instead of running on the target platform.
#[derive(Debug, Clone)]
pub struct Platform {
    pub list_separator: char,
    pub extensions: Vec<String>,
}

impl Platform {
    /// The strategy for the compiling platform.
    #[cfg(not(windows))]
    pub fn native() -> Self {
        Self {
            list_separator: ':',
            extensions: Vec::new(),
        }
    }

    /// The strategy for the compiling platform. Extensions come from
    /// `PATHEXT`, lowercased, in declared order.
    #[cfg(windows)]
    pub fn native() -> Self {
        let extensions = env::var("PATHEXT")
            .map(|v| {
                v.to_lowercase()
                    .split(';')
                    .filter(|ext| !ext.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            list_separator: ';',
            extensions,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::native()
    }
}

/// Resolver for executable references.
///
/// The home directory and platform strategy are injectable so tests never
/// depend on ambient state.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    /// Override for the home directory used in `~/` expansion.
    home_override: Option<PathBuf>,
    platform: Platform,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with a custom home directory (useful for testing).
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_override = Some(home.into());
        self
    }

    /// Creates a resolver with a custom platform lookup strategy.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolves `raw` against `cwd` and the given `PATH`-style string.
    ///
    /// Lookup order, first success wins:
    ///
    /// 1. A leading `~/` is expanded to the home directory.
    /// 2. A reference containing a path separator is tried as an explicit
    ///    path: absolute-and-exists resolves directly, otherwise it is
    ///    joined to `cwd` (when supplied) and taken if that exists.
    /// 3. Each non-empty entry of `path_env` is joined with the reference;
    ///    extensionless references additionally try the platform's
    ///    extension list in order. The first existing non-directory file
    ///    wins. An explicit path reference that matched nothing in step 2
    ///    still falls through to this search.
    /// 4. Otherwise the resolution carries no path.
    #[instrument(level = Level::TRACE, skip(self))]
    pub fn resolve(&self, raw: &str, cwd: &str, path_env: &str) -> CommandResolution {
        let reference = self.expand_home(raw);

        if reference.contains('/') || reference.contains('\\') {
            let path = Path::new(&reference);
            if path.is_absolute() && fs::metadata(path).is_ok() {
                return self.resolution(raw, &reference, Some(reference.clone()));
            }
            if !cwd.is_empty() {
                let candidate = Path::new(cwd).join(&reference);
                if fs::metadata(&candidate).is_ok() {
                    let found = candidate.to_string_lossy().into_owned();
                    return self.resolution(raw, &reference, Some(found));
                }
            }
        }

        let found = self
            .search_path(&reference, path_env)
            .map(|p| p.to_string_lossy().into_owned());
        self.resolution(raw, &reference, found)
    }

    fn resolution(
        &self,
        raw: &str,
        reference: &str,
        resolved_path: Option<String>,
    ) -> CommandResolution {
        CommandResolution {
            raw_executable: raw.to_string(),
            resolved_path,
            executable_name: base_name(reference),
        }
    }

    /// Substitutes the home directory for a leading `~/`. A bare `~` or a
    /// missing home directory leaves the reference untouched.
    fn expand_home(&self, raw: &str) -> String {
        match (raw.strip_prefix("~/"), self.home_dir()) {
            (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
            _ => raw.to_string(),
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        if let Some(ref home) = self.home_override {
            return Some(home.clone());
        }
        env::var("HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(dirs::home_dir)
    }

    /// Walks the `path_env` entries looking for an existing non-directory
    /// file, trying extension suffixes for extensionless references.
    fn search_path(&self, reference: &str, path_env: &str) -> Option<PathBuf> {
        let suffixes = self.candidate_suffixes(reference);
        for dir in path_env.split(self.platform.list_separator) {
            if dir.is_empty() {
                continue;
            }
            for suffix in &suffixes {
                let candidate = Path::new(dir).join(format!("{reference}{suffix}"));
                if is_existing_file(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Suffixes to append during the `PATH` walk: just the bare reference
    /// when it already carries an extension, otherwise the bare reference
    /// followed by each platform extension in order.
    fn candidate_suffixes(&self, reference: &str) -> Vec<String> {
        let mut suffixes = vec![String::new()];
        if Path::new(reference).extension().is_none() {
            suffixes.extend(self.platform.extensions.iter().cloned());
        }
        suffixes
    }
}

fn is_existing_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Last path segment of a reference, as a string.
fn base_name(reference: &str) -> String {
    Path::new(reference)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| reference.to_string())
}
