//! # Read-Through Resolution Cache
//!
//! The synchronous resolution path probes an in-process cache before the
//! engine ever touches the store. A probe has three possible answers, and
//! the distinction matters:
//!
//! - [`CacheAnswer::Found`] - the cache holds rows for the key (possibly
//!   none matching the narrower filters; an empty row set is definitive).
//! - [`CacheAnswer::Absent`] - the cache asserts the store has no such
//!   record (a negative entry).
//! - [`CacheAnswer::Unknown`] - the cache has no opinion; the caller must
//!   fall through to the store.
//!
//! [`MemoryCache`] is the provided implementation: a `parking_lot`-guarded
//! map with explicit negative entries, suitable for tests and embedders.
//! The on-disk cache reader of the full gateway stays behind this trait.

use crate::store::{BioseqInfoQuery, SynonymQuery};
use parking_lot::RwLock;
use seqres::{BioseqInfo, SynonymRecord};
use std::collections::{HashMap, HashSet};

/// Tri-state answer of a cache probe.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheAnswer<T> {
    /// Rows for the key, already narrowed by the query's filters.
    Found(Vec<T>),
    /// Definitively not present in the store.
    Absent,
    /// Not cached; the store must be consulted.
    Unknown,
}

/// Synchronous lookup capability mirroring the two store tables.
pub trait ResolutionCache: Send + Sync {
    fn lookup_bioseq_info(&self, query: &BioseqInfoQuery) -> CacheAnswer<BioseqInfo>;
    fn lookup_synonyms(&self, query: &SynonymQuery) -> CacheAnswer<SynonymRecord>;
}

#[derive(Default)]
struct MemoryCacheInner {
    bioseq_info: HashMap<String, Vec<BioseqInfo>>,
    synonyms: HashMap<String, Vec<SynonymRecord>>,
    absent_accessions: HashSet<String>,
    absent_secondary_ids: HashSet<String>,
}

/// In-memory [`ResolutionCache`] with explicit negative entries.
#[derive(Default)]
pub struct MemoryCache {
    inner: RwLock<MemoryCacheInner>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches a primary-table row under its accession.
    pub fn insert_bioseq_info(&self, record: BioseqInfo) {
        let mut inner = self.inner.write();
        inner.absent_accessions.remove(&record.accession);
        inner
            .bioseq_info
            .entry(record.accession.clone())
            .or_default()
            .push(record);
    }

    /// Caches a synonym-table row under its secondary id.
    pub fn insert_synonym(&self, record: SynonymRecord) {
        let mut inner = self.inner.write();
        inner.absent_secondary_ids.remove(&record.secondary_id);
        inner
            .synonyms
            .entry(record.secondary_id.clone())
            .or_default()
            .push(record);
    }

    /// Records that the store has no primary row for `accession`.
    pub fn mark_bioseq_info_absent(&self, accession: impl Into<String>) {
        self.inner.write().absent_accessions.insert(accession.into());
    }

    /// Records that the store has no synonym row for `secondary_id`.
    pub fn mark_synonym_absent(&self, secondary_id: impl Into<String>) {
        self.inner
            .write()
            .absent_secondary_ids
            .insert(secondary_id.into());
    }

    pub fn clear(&self) {
        *self.inner.write() = MemoryCacheInner::default();
    }
}

impl ResolutionCache for MemoryCache {
    fn lookup_bioseq_info(&self, query: &BioseqInfoQuery) -> CacheAnswer<BioseqInfo> {
        let inner = self.inner.read();
        if let Some(rows) = inner.bioseq_info.get(&query.accession) {
            let matched = rows
                .iter()
                .filter(|row| {
                    query.version.is_none_or(|v| row.version == v)
                        && query.seq_id_type.is_none_or(|t| row.seq_id_type == t)
                        && query.gi.is_none_or(|gi| row.gi == gi)
                })
                .cloned()
                .collect();
            return CacheAnswer::Found(matched);
        }
        if inner.absent_accessions.contains(&query.accession) {
            return CacheAnswer::Absent;
        }
        CacheAnswer::Unknown
    }

    fn lookup_synonyms(&self, query: &SynonymQuery) -> CacheAnswer<SynonymRecord> {
        let inner = self.inner.read();
        if let Some(rows) = inner.synonyms.get(&query.secondary_id) {
            let matched = rows
                .iter()
                .filter(|row| query.seq_id_type.is_none_or(|t| row.secondary_id_type == t))
                .cloned()
                .collect();
            return CacheAnswer::Found(matched);
        }
        if inner.absent_secondary_ids.contains(&query.secondary_id) {
            return CacheAnswer::Absent;
        }
        CacheAnswer::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(accession: &str, version: i16, seq_id_type: i16) -> BioseqInfo {
        BioseqInfo {
            accession: accession.into(),
            version,
            seq_id_type,
            ..BioseqInfo::default()
        }
    }

    #[test]
    fn probe_distinguishes_unknown_from_absent() {
        let cache = MemoryCache::new();
        let query = BioseqInfoQuery::by_accession("NM_000001");

        assert_eq!(cache.lookup_bioseq_info(&query), CacheAnswer::Unknown);

        cache.mark_bioseq_info_absent("NM_000001");
        assert_eq!(cache.lookup_bioseq_info(&query), CacheAnswer::Absent);
    }

    #[test]
    fn filters_narrow_cached_rows() {
        let cache = MemoryCache::new();
        cache.insert_bioseq_info(record("NM_000001", 1, 10));
        cache.insert_bioseq_info(record("NM_000001", 2, 10));

        let all = BioseqInfoQuery::by_accession("NM_000001");
        match cache.lookup_bioseq_info(&all) {
            CacheAnswer::Found(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected {other:?}"),
        }

        let versioned = BioseqInfoQuery {
            version: Some(2),
            ..all.clone()
        };
        match cache.lookup_bioseq_info(&versioned) {
            CacheAnswer::Found(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].version, 2);
            }
            other => panic!("unexpected {other:?}"),
        }

        // A cached key with no matching version is definitive, not unknown.
        let missing_version = BioseqInfoQuery {
            version: Some(9),
            ..all
        };
        assert_eq!(
            cache.lookup_bioseq_info(&missing_version),
            CacheAnswer::Found(Vec::new())
        );
    }

    #[test]
    fn inserting_clears_a_negative_entry() {
        let cache = MemoryCache::new();
        cache.mark_synonym_absent("GI|123");
        cache.insert_synonym(SynonymRecord {
            secondary_id: "GI|123".into(),
            secondary_id_type: 12,
            accession: "NM_000001".into(),
            version: 1,
            seq_id_type: 10,
            gi: 123,
        });

        let query = SynonymQuery {
            secondary_id: "GI|123".into(),
            seq_id_type: Some(12),
        };
        match cache.lookup_synonyms(&query) {
            CacheAnswer::Found(rows) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}
