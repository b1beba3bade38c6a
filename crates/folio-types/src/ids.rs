//! Typed identifiers for documents, blocks, and history entries.
//!
//! All ID types wrap UUIDv7 (time-ordered, globally unique). They serialize as
//! standard UUID text and display the same way for logging. The `short()` form
//! (first 8 hex chars) is for human-facing output, never used as a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(uuid::Uuid);

/// A block identifier (UUIDv7). Unique within its owning collection and never reused.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

/// A history entry identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters, for human display only (not lookup).
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// Check if a query string matches this ID by hex prefix.
            pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
                self.to_hex().starts_with(prefix)
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::str::FromStr for $T {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(DocumentId, "DocumentId");
impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(HistoryEntryId, "HistoryEntryId");

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from ambiguous prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no match for '{0}'")]
    NoMatch(String),
    #[error("ambiguous '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a query string against document IDs and their names.
///
/// Resolution order:
/// 1. Exact name match
/// 2. Unique name prefix match
/// 3. Unique hex prefix match (hyphens in the query are ignored)
pub fn resolve_document_prefix<'a>(
    documents: impl Iterator<Item = (DocumentId, &'a str)>,
    query: &str,
) -> Result<DocumentId, PrefixError> {
    let entries: Vec<(DocumentId, &str)> = documents.collect();

    if let Some(&(id, _)) = entries.iter().find(|(_, name)| *name == query) {
        return Ok(id);
    }

    let name_matches: Vec<(DocumentId, &str)> = entries
        .iter()
        .filter(|(_, name)| !query.is_empty() && name.starts_with(query))
        .copied()
        .collect();

    if name_matches.len() == 1 {
        return Ok(name_matches[0].0);
    }
    if name_matches.len() > 1 {
        return Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: name_matches.iter().map(|(_, n)| n.to_string()).collect(),
        });
    }

    let hex_query = query.replace('-', "").to_ascii_lowercase();
    let hex_matches: Vec<DocumentId> = entries
        .iter()
        .filter(|(id, _)| !hex_query.is_empty() && id.matches_hex_prefix(&hex_query))
        .map(|(id, _)| *id)
        .collect();

    match hex_matches.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(hex_matches[0]),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: hex_matches.iter().map(|id| id.short()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unique() {
        assert_ne!(BlockId::new(), BlockId::new());
    }

    #[test]
    fn test_short_is_8_chars() {
        assert_eq!(DocumentId::new().short().len(), 8);
    }

    #[test]
    fn test_parse_hex_and_uuid_format() {
        let id = BlockId::new();
        assert_eq!(BlockId::parse(&id.to_hex()).unwrap(), id);
        assert_eq!(BlockId::parse(&id.to_string()).unwrap(), id);
        assert_eq!(id.to_string().parse::<BlockId>().unwrap(), id);
    }

    #[test]
    fn test_serde_is_plain_uuid_string() {
        let id = DocumentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let parsed: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_debug_shows_type_and_short() {
        let id = HistoryEntryId::new();
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("HistoryEntryId("));
        assert!(debug.ends_with(')'));
    }

    #[test]
    fn test_resolve_exact_name() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        let entries = vec![(a, "resume"), (b, "resume-2024")];
        assert_eq!(resolve_document_prefix(entries.into_iter(), "resume").unwrap(), a);
    }

    #[test]
    fn test_resolve_name_prefix() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        let entries = vec![(a, "landing-page"), (b, "resume")];
        assert_eq!(resolve_document_prefix(entries.into_iter(), "land").unwrap(), a);
    }

    #[test]
    fn test_resolve_hex_prefix() {
        let a = DocumentId::new();
        let entries = vec![(a, "resume")];
        let prefix = a.short();
        assert_eq!(resolve_document_prefix(entries.into_iter(), &prefix).unwrap(), a);
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let entries = vec![(DocumentId::new(), "cv-1"), (DocumentId::new(), "cv-2")];
        let result = resolve_document_prefix(entries.into_iter(), "cv");
        assert!(matches!(result, Err(PrefixError::Ambiguous { .. })));
    }

    #[test]
    fn test_resolve_no_match() {
        let entries = vec![(DocumentId::new(), "resume")];
        let result = resolve_document_prefix(entries.into_iter(), "zzz");
        assert!(matches!(result, Err(PrefixError::NoMatch(_))));
    }
}
