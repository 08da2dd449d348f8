//! # Resolution Outcome
//!
//! [`ResolutionOutcome`] is the unit handed back to the orchestrating
//! request context: which path produced the answer, the chosen record (if
//! any), how many store queries the cascade issued, and timestamps for
//! latency accounting. It is move-only - exactly one producer and one
//! consumer per request.

use crate::record::BioseqInfo;
use std::time::{Duration, Instant};

/// Which path of the cascade produced (or ended) a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// A primary-table row matched directly.
    PrimaryTable,
    /// A synonym-table mapping produced (and, where required, a confirming
    /// read validated) the record.
    SynonymTable,
    /// The local cache answered from its primary-record entries.
    PrimaryCache,
    /// The local cache answered from its synonym entries.
    SynonymCache,
    /// Every stage exhausted without a hit.
    NotResolved,
    /// The orchestrator flagged the request cancelled mid-cascade.
    Cancelled,
}

impl ResolutionSource {
    /// Whether this source carries a usable record.
    pub const fn is_resolved(self) -> bool {
        matches!(
            self,
            Self::PrimaryTable | Self::SynonymTable | Self::PrimaryCache | Self::SynonymCache
        )
    }
}

/// Terminal result of one resolution attempt. Move-only.
#[derive(Debug)]
pub struct ResolutionOutcome {
    source: ResolutionSource,
    record: Option<BioseqInfo>,
    queries_issued: u32,
    started_at: Instant,
    finished_at: Instant,
}

impl ResolutionOutcome {
    /// Seals an outcome; `finished_at` is stamped now.
    pub fn new(
        source: ResolutionSource,
        record: Option<BioseqInfo>,
        queries_issued: u32,
        started_at: Instant,
    ) -> Self {
        Self {
            source,
            record,
            queries_issued,
            started_at,
            finished_at: Instant::now(),
        }
    }

    pub fn source(&self) -> ResolutionSource {
        self.source
    }

    pub fn is_resolved(&self) -> bool {
        self.source.is_resolved()
    }

    /// The chosen record, or an empty record for not-resolved outcomes.
    pub fn record(&self) -> &BioseqInfo {
        static EMPTY: std::sync::OnceLock<BioseqInfo> = std::sync::OnceLock::new();
        self.record
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(BioseqInfo::empty))
    }

    pub fn into_record(self) -> Option<BioseqInfo> {
        self.record
    }

    /// Count of store queries the cascade issued, for diagnostics.
    pub fn queries_issued(&self) -> u32 {
        self.queries_issued
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.finished_at.duration_since(self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_classify_resolution() {
        assert!(ResolutionSource::PrimaryTable.is_resolved());
        assert!(ResolutionSource::SynonymCache.is_resolved());
        assert!(!ResolutionSource::NotResolved.is_resolved());
        assert!(!ResolutionSource::Cancelled.is_resolved());
    }

    #[test]
    fn empty_outcome_exposes_an_empty_record() {
        let outcome =
            ResolutionOutcome::new(ResolutionSource::NotResolved, None, 5, Instant::now());
        assert!(!outcome.is_resolved());
        assert_eq!(outcome.queries_issued(), 5);
        assert!(outcome.record().accession.is_empty());
        assert!(outcome.into_record().is_none());
    }
}
