//! # Store Fetch Capability
//!
//! The resolver never talks to the column store directly; it issues queries
//! through [`SequenceStore`], an opaque async row-fetch capability. A real
//! implementation wraps the store's network client; tests script one.
//!
//! Two query shapes exist, one per logical table:
//!
//! - [`BioseqInfoQuery`] against the primary table, keyed by accession with
//!   optional version / seq-id type / GI filters.
//! - [`SynonymQuery`] against the synonym table, keyed by secondary id with
//!   an optional seq-id type filter.
//!
//! A fetch resolves to the matching rows or to a [`StoreError`] that the
//! engine propagates verbatim - the resolver itself never retries store
//! failures.

use async_trait::async_trait;
use seqres::{BioseqInfo, ResolveError, Severity, SynonymRecord};

/// One primary-table query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BioseqInfoQuery {
    pub accession: String,
    pub version: Option<i16>,
    pub seq_id_type: Option<i16>,
    pub gi: Option<i64>,
}

impl BioseqInfoQuery {
    /// A query on accession alone, every other axis unfiltered.
    pub fn by_accession(accession: impl Into<String>) -> Self {
        Self {
            accession: accession.into(),
            version: None,
            seq_id_type: None,
            gi: None,
        }
    }

    /// The same query with the seq-id type filter dropped - the shape of
    /// the INSDC type-relaxed retry.
    pub fn untyped(&self) -> Self {
        Self {
            seq_id_type: None,
            ..self.clone()
        }
    }
}

/// One synonym-table query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SynonymQuery {
    pub secondary_id: String,
    pub seq_id_type: Option<i16>,
}

/// Failure reported by the store client.
///
/// Mirrors the error callback shape of the underlying fetch capability:
/// status code, application error code, severity, message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} ({severity}, status {status_code}, code {app_error_code})")]
pub struct StoreError {
    pub status_code: u16,
    pub app_error_code: u32,
    pub severity: Severity,
    pub message: String,
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        Self::Store {
            status_code: err.status_code,
            app_error_code: err.app_error_code,
            severity: err.severity,
            message: err.message,
        }
    }
}

/// Asynchronous row-fetch capability over the two logical tables.
///
/// Implementations must be non-blocking; the engine guarantees at most one
/// fetch in flight per resolution attempt and fully processes a completion
/// before issuing the next query.
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Fetches primary-table rows matching `query`.
    async fn fetch_bioseq_info(
        &self,
        query: &BioseqInfoQuery,
    ) -> Result<Vec<BioseqInfo>, StoreError>;

    /// Fetches synonym-table rows matching `query`.
    async fn fetch_synonyms(&self, query: &SynonymQuery)
    -> Result<Vec<SynonymRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untyped_retry_only_drops_the_type_filter() {
        let typed = BioseqInfoQuery {
            accession: "NM_000001".into(),
            version: Some(2),
            seq_id_type: Some(5),
            gi: Some(77),
        };
        let untyped = typed.untyped();
        assert_eq!(untyped.accession, "NM_000001");
        assert_eq!(untyped.version, Some(2));
        assert_eq!(untyped.seq_id_type, None);
        assert_eq!(untyped.gi, Some(77));
    }

    #[test]
    fn store_errors_propagate_verbatim() {
        let err = StoreError {
            status_code: 503,
            app_error_code: 42,
            severity: Severity::Error,
            message: "keyspace unavailable".into(),
        };
        match ResolveError::from(err) {
            ResolveError::Store {
                status_code,
                app_error_code,
                severity,
                message,
            } => {
                assert_eq!(status_code, 503);
                assert_eq!(app_error_code, 42);
                assert_eq!(severity, Severity::Error);
                assert_eq!(message, "keyspace unavailable");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
