//! Synchronous rendition of the cascade against the read-through cache.
//!
//! Mirrors the stage order and disambiguation rules of the async engine in
//! [`super::attempt`], but every lookup is a cache probe with a tri-state
//! answer. A definitive answer (rows, or a negative entry) advances the
//! cascade exactly as the store would; an unknown answer aborts the cache
//! path entirely and the async engine re-runs the request from `Init` with
//! the same frozen candidates, which is what keeps the two paths
//! byte-for-byte consistent.

use super::attempt::{ResolveStage, entry_stage, primary_candidate};
use crate::cache::{CacheAnswer, ResolutionCache};
use crate::request::ResolveRequest;
use crate::resolver::SeqIdResolver;
use crate::store::{BioseqInfoQuery, SynonymQuery};
use crate::telemetry::LookupTable;
use seqres::{
    BioseqInfo, ResolutionOutcome, ResolutionSource, RowMatch, SynonymRecord, disambiguate,
    modified_fallback_form, normalize_case,
};
use std::mem;
use std::time::Instant;

/// Runs the cascade against the cache alone.
///
/// Returns `None` when some probe was inconclusive and the store must take
/// over from the start.
pub(super) fn resolve_via_cache<S>(
    resolver: &SeqIdResolver<S>,
    cache: &dyn ResolutionCache,
    request: &ResolveRequest,
    started_at: Instant,
) -> Option<ResolutionOutcome> {
    let composed = &request.composed;
    let mut stage = ResolveStage::Init;
    let mut secondary_index = 0usize;
    let mut last_primary: Option<(String, Option<i16>)> = None;

    let finish = |source: ResolutionSource, record: Option<BioseqInfo>| {
        // Cache probes are not store queries; the diagnostic count stays 0.
        let outcome = ResolutionOutcome::new(source, record, 0, started_at);
        resolver.telemetry.on_resolution(source, outcome.elapsed());
        Some(outcome)
    };

    loop {
        if request.cancel.is_cancelled() {
            return finish(ResolutionSource::Cancelled, None);
        }

        match mem::replace(&mut stage, ResolveStage::Finished) {
            ResolveStage::Init => {
                stage = entry_stage(composed);
            }
            ResolveStage::PrimaryLookup => {
                let Some(accession) = primary_candidate(composed).map(str::to_string) else {
                    stage = ResolveStage::SecondarySynonymLoop;
                    continue;
                };
                let query = BioseqInfoQuery {
                    accession,
                    version: composed.version,
                    seq_id_type: composed.seq_id_type,
                    gi: None,
                };
                last_primary = Some((query.accession.clone(), query.seq_id_type));
                let rows = probe_bioseq_info(resolver, cache, &query)?;
                stage = ResolveStage::SecondarySynonymLoop;

                match disambiguate(rows, query.version) {
                    RowMatch::Unique(record) => {
                        return finish(ResolutionSource::PrimaryCache, Some(record));
                    }
                    RowMatch::Missing if insdc_retry_applies(resolver, &query) => {
                        let rows = probe_bioseq_info(resolver, cache, &query.untyped())?;
                        if let RowMatch::Unique(record) = disambiguate(rows, query.version) {
                            return finish(ResolutionSource::PrimaryCache, Some(record));
                        }
                    }
                    RowMatch::Missing | RowMatch::Ambiguous(_) => {}
                }
            }
            ResolveStage::SecondarySynonymLoop => {
                let Some(secondary_id) = composed.secondary_ids.get(secondary_index).cloned()
                else {
                    stage = ResolveStage::AsIsFallback;
                    continue;
                };
                secondary_index += 1;
                stage = ResolveStage::SecondarySynonymLoop;

                let query = SynonymQuery {
                    secondary_id,
                    seq_id_type: composed.seq_id_type,
                };
                let rows = probe_synonyms(resolver, cache, &query)?;
                if let RowMatch::Unique(row) = disambiguate(rows, composed.version) {
                    let skeleton = BioseqInfo::from_synonym(&row);
                    if resolver.policy.needs_primary_confirmation(&skeleton) {
                        stage = ResolveStage::PostSynonymPrimaryLookup(skeleton);
                    } else {
                        return finish(ResolutionSource::SynonymCache, Some(skeleton));
                    }
                }
            }
            ResolveStage::PostSynonymPrimaryLookup(skeleton) => {
                let query = BioseqInfoQuery {
                    accession: skeleton.accession.clone(),
                    version: skeleton.version_opt(),
                    seq_id_type: skeleton.seq_id_type_opt(),
                    gi: skeleton.gi_opt(),
                };
                let rows = probe_bioseq_info(resolver, cache, &query)?;
                match disambiguate(rows, query.version) {
                    RowMatch::Unique(record) => {
                        return finish(ResolutionSource::SynonymCache, Some(record));
                    }
                    // Integrity verdicts belong to the store - the cache
                    // may simply be stale. Hand the request over.
                    RowMatch::Missing | RowMatch::Ambiguous(_) => return None,
                }
            }
            ResolveStage::AsIsFallback => {
                let as_is = normalize_case(&request.raw_id);
                stage = ResolveStage::AsIsModifiedFallback(as_is.clone());

                let duplicate = last_primary.as_ref().is_some_and(|(accession, seq_id_type)| {
                    accession.eq_ignore_ascii_case(&as_is)
                        && *seq_id_type == request.url_seq_id_type
                });
                if duplicate {
                    continue;
                }

                let query = SynonymQuery {
                    secondary_id: as_is,
                    seq_id_type: request.url_seq_id_type,
                };
                let rows = probe_synonyms(resolver, cache, &query)?;
                if let RowMatch::Unique(row) = disambiguate(rows, composed.version) {
                    return finish(
                        ResolutionSource::SynonymCache,
                        Some(BioseqInfo::from_synonym(&row)),
                    );
                }
            }
            ResolveStage::AsIsModifiedFallback(as_is) => {
                let query = SynonymQuery {
                    secondary_id: modified_fallback_form(&as_is),
                    seq_id_type: request.url_seq_id_type,
                };
                let rows = probe_synonyms(resolver, cache, &query)?;
                if let RowMatch::Unique(row) = disambiguate(rows, composed.version) {
                    return finish(
                        ResolutionSource::SynonymCache,
                        Some(BioseqInfo::from_synonym(&row)),
                    );
                }
            }
            ResolveStage::Finished => {
                return finish(ResolutionSource::NotResolved, None);
            }
        }
    }
}

fn insdc_retry_applies<S>(resolver: &SeqIdResolver<S>, query: &BioseqInfoQuery) -> bool {
    query
        .seq_id_type
        .is_some_and(|seq_id_type| resolver.policy.is_insdc_type(seq_id_type))
}

fn probe_bioseq_info<S>(
    resolver: &SeqIdResolver<S>,
    cache: &dyn ResolutionCache,
    query: &BioseqInfoQuery,
) -> Option<Vec<BioseqInfo>> {
    let answer = cache.lookup_bioseq_info(query);
    let conclusive = !matches!(answer, CacheAnswer::Unknown);
    resolver
        .telemetry
        .on_cache_probe(LookupTable::BioseqInfo, conclusive);
    match answer {
        CacheAnswer::Found(rows) => Some(rows),
        CacheAnswer::Absent => Some(Vec::new()),
        CacheAnswer::Unknown => None,
    }
}

fn probe_synonyms<S>(
    resolver: &SeqIdResolver<S>,
    cache: &dyn ResolutionCache,
    query: &SynonymQuery,
) -> Option<Vec<SynonymRecord>> {
    let answer = cache.lookup_synonyms(query);
    let conclusive = !matches!(answer, CacheAnswer::Unknown);
    resolver
        .telemetry
        .on_cache_probe(LookupTable::Si2Csi, conclusive);
    match answer {
        CacheAnswer::Found(rows) => Some(rows),
        CacheAnswer::Absent => Some(Vec::new()),
        CacheAnswer::Unknown => None,
    }
}
