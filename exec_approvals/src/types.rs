//! Wire types shared by the matcher, the resolver, and the CLI.
//!
//! Field names follow the camelCase JSON convention of the callers that
//! persist allowlists and consume resolutions; optional fields are omitted
//! on output and default to `None` on input.

use serde::{Deserialize, Serialize};
use tracing::{Level, instrument};

use crate::error::Result;

/// One pre-approved command pattern plus caller-managed usage metadata.
///
/// Only `pattern` participates in matching. The remaining fields travel with
/// the entry so a caller can record which pattern last fired and what it
/// resolved to; this library never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Glob pattern: `*` matches any run of characters, `?` exactly one,
    /// everything else is literal.
    pub pattern: String,

    /// Epoch milliseconds of the last successful match, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_resolved_path: Option<String>,
}

impl AllowlistEntry {
    /// Creates an entry holding just a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }
}

/// An ordered set of allowlist entries.
///
/// Serializes transparently as a JSON array. Matching operations live in
/// [`crate::allowlist`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allowlist(pub Vec<AllowlistEntry>);

impl Allowlist {
    /// Parses an allowlist from a JSON array of entries.
    #[instrument(level = Level::TRACE, skip(json))]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AllowlistEntry> {
        self.0.iter()
    }
}

impl From<Vec<AllowlistEntry>> for Allowlist {
    fn from(entries: Vec<AllowlistEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<AllowlistEntry> for Allowlist {
    fn from_iter<I: IntoIterator<Item = AllowlistEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The outcome of resolving an executable reference.
///
/// `resolved_path` is present only when an existing filesystem entry was
/// found; an unresolved executable is a normal outcome, not an error.
/// `executable_name` is always the last path segment of the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResolution {
    pub raw_executable: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,

    pub executable_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_with_only_pattern() {
        let entry: AllowlistEntry = serde_json::from_str(r#"{"pattern": "git *"}"#).unwrap();
        assert_eq!(entry.pattern, "git *");
        assert!(entry.id.is_none());
        assert!(entry.last_used_at.is_none());
    }

    #[test]
    fn test_entry_round_trips_camel_case() {
        let entry = AllowlistEntry {
            id: Some("e1".into()),
            pattern: "npm run *".into(),
            last_used_at: Some(1_700_000_000_000),
            last_used_command: Some("npm run build".into()),
            last_resolved_path: Some("/usr/bin/npm".into()),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["pattern"], "npm run *");
        assert_eq!(json["lastUsedAt"], 1_700_000_000_000i64);
        assert_eq!(json["lastUsedCommand"], "npm run build");
        assert_eq!(json["lastResolvedPath"], "/usr/bin/npm");

        let back: AllowlistEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_omits_absent_metadata() {
        let json = serde_json::to_string(&AllowlistEntry::new("ls")).unwrap();
        assert_eq!(json, r#"{"pattern":"ls"}"#);
    }

    #[test]
    fn test_allowlist_is_transparent_array() {
        let list = Allowlist::from_json(r#"[{"pattern": "a"}, {"pattern": "b"}]"#).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().map(|e| e.pattern.as_str()).collect::<Vec<_>>(), ["a", "b"]);

        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"[{"pattern":"a"},{"pattern":"b"}]"#);
    }

    #[test]
    fn test_allowlist_rejects_malformed_json() {
        assert!(Allowlist::from_json("not json").is_err());
        assert!(Allowlist::from_json(r#"{"pattern": "a"}"#).is_err());
    }

    #[test]
    fn test_resolution_omits_absent_path() {
        let res = CommandResolution {
            raw_executable: "ls".into(),
            resolved_path: None,
            executable_name: "ls".into(),
        };
        let json = serde_json::to_string(&res).unwrap();
        assert_eq!(json, r#"{"rawExecutable":"ls","executableName":"ls"}"#);
    }

    #[test]
    fn test_resolution_serializes_resolved_path() {
        let res = CommandResolution {
            raw_executable: "ls".into(),
            resolved_path: Some("/bin/ls".into()),
            executable_name: "ls".into(),
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["rawExecutable"], "ls");
        assert_eq!(json["resolvedPath"], "/bin/ls");
        assert_eq!(json["executableName"], "ls");
    }
}
