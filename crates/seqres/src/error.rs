//! Error types for seq-id resolution.
//!
//! Only two error classes ever cross the resolver's boundary:
//!
//! - `Store`: a failure reported by the backing store, propagated verbatim.
//!   The resolver never retries these; retry policy belongs to the store
//!   client.
//! - `DataIntegrity`: the two backing tables disagree about a record that a
//!   synonym mapping vouched for. Never retried.
//!
//! Transient lookup ambiguity (zero or multiple rows outside the
//! confirmation branch) is not an error - the cascade continues internally.
//! Cancellation is not an error either; it surfaces as a distinguished
//! outcome.

use core::fmt;

pub type Result<T> = core::result::Result<T, ResolveError>;

/// Severity attached to a store-reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// How the confirming primary-table read disagreed with the synonym mapping.
///
/// The two variants carry deliberately distinct wording so operators can
/// tell a vanished record from a duplicated one in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegrityKind {
    /// The synonym table mapped to a record the primary table does not have.
    NotFound,
    /// The primary table holds more than one record for the mapped key.
    MultipleFound { count: usize },
}

impl fmt::Display for IntegrityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => {
                write!(f, "no bioseq_info record matches the si2csi mapping")
            }
            Self::MultipleFound { count } => {
                write!(f, "{count} bioseq_info records match the si2csi mapping")
            }
        }
    }
}

/// Unified error type for the resolution engine.
#[derive(Clone, thiserror::Error, Debug, PartialEq)]
pub enum ResolveError {
    /// The backing store reported a failure (connection, timeout, protocol).
    /// Carried verbatim to the terminal error callback.
    #[error("store failure ({severity}, status {status_code}, code {app_error_code}): {message}")]
    Store {
        status_code: u16,
        app_error_code: u32,
        severity: Severity,
        message: String,
    },

    /// The bioseq_info and si2csi tables disagree about `accession`.
    #[error("data integrity: {kind} for accession {accession}")]
    DataIntegrity {
        accession: String,
        kind: IntegrityKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_wordings_are_distinct() {
        let missing = ResolveError::DataIntegrity {
            accession: "X".into(),
            kind: IntegrityKind::NotFound,
        };
        let duplicated = ResolveError::DataIntegrity {
            accession: "X".into(),
            kind: IntegrityKind::MultipleFound { count: 2 },
        };

        let missing = missing.to_string();
        let duplicated = duplicated.to_string();
        assert_ne!(missing, duplicated);
        assert!(missing.contains("accession X"));
        assert!(missing.contains("no bioseq_info record"));
        assert!(duplicated.contains("2 bioseq_info records"));
    }

    #[test]
    fn store_failures_render_all_fields() {
        let error = ResolveError::Store {
            status_code: 504,
            app_error_code: 2001,
            severity: Severity::Critical,
            message: "connection pool exhausted".into(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("504"));
        assert!(rendered.contains("2001"));
        assert!(rendered.contains("critical"));
        assert!(rendered.contains("connection pool exhausted"));
    }
}
