//! # The Asynchronous Resolution Cascade
//!
//! One [`ResolutionAttempt`] owns the whole lifecycle of resolving a single
//! seq-id against the store: which stage the cascade is in, which secondary
//! candidate comes next, and the bookkeeping the later stages need about
//! queries already issued. The driver is a plain loop that dispatches on an
//! explicit [`ResolveStage`] value; a fetch's completion is fully processed
//! before the next query can be issued, which enforces the single-flight
//! invariant structurally and keeps the trace of issued queries independent
//! of callback timing.
//!
//! ## Stage order
//!
//! `Init → PrimaryLookup → SecondarySynonymLoop → AsIsFallback →
//! AsIsModifiedFallback → Finished`, with the `PostSynonymPrimaryLookup`
//! side-branch entered only from the synonym loop when a mapping needs a
//! confirming primary read. Progression is forward-only: the dispatch takes
//! the stage by value and every arm either finishes, fails, or assigns the
//! successor; an arm that assigns nothing lands on `Finished`.

use crate::request::ResolveRequest;
use crate::resolver::SeqIdResolver;
use crate::store::{BioseqInfoQuery, SequenceStore, SynonymQuery};
use crate::telemetry::LookupTable;
use seqres::{
    BioseqInfo, ComposedSeqId, IntegrityKind, ResolutionOutcome, ResolutionSource, ResolveError,
    RowMatch, SynonymRecord, disambiguate, modified_fallback_form, normalize_case,
};
use std::mem;
use std::time::Instant;

/// Stages of the lookup cascade.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum ResolveStage {
    Init,
    PrimaryLookup,
    SecondarySynonymLoop,
    /// Confirming primary read for a skeleton adopted from a synonym hit;
    /// carries the skeleton.
    PostSynonymPrimaryLookup(BioseqInfo),
    AsIsFallback,
    /// Carries the case-normalized identifier produced by the previous
    /// stage.
    AsIsModifiedFallback(String),
    Finished,
}

/// Where the cascade starts for a given decomposition: a failed composition
/// has nothing but the raw identifier to try, and a composition without a
/// primary candidate starts at the synonym loop.
pub(super) fn entry_stage(composed: &ComposedSeqId) -> ResolveStage {
    if !composed.composed_ok {
        ResolveStage::AsIsFallback
    } else if primary_candidate(composed).is_none() {
        ResolveStage::SecondarySynonymLoop
    } else {
        ResolveStage::PrimaryLookup
    }
}

pub(super) fn primary_candidate(composed: &ComposedSeqId) -> Option<&str> {
    composed.primary_id.as_deref().filter(|id| !id.is_empty())
}

/// Why a stage step stopped short of producing an outcome.
enum Interrupt {
    Cancelled,
    Failed(ResolveError),
}

type StepResult = Result<Option<ResolutionOutcome>, Interrupt>;

pub(super) struct ResolutionAttempt<'a, S> {
    resolver: &'a SeqIdResolver<S>,
    request: &'a ResolveRequest,
    stage: ResolveStage,
    secondary_index: usize,
    /// Accession and type filter of the primary lookup already issued, so
    /// the as-is fallback can recognize a would-be duplicate query.
    last_primary: Option<(String, Option<i16>)>,
    queries_issued: u32,
    started_at: Instant,
}

impl<'a, S: SequenceStore> ResolutionAttempt<'a, S> {
    pub(super) fn new(
        resolver: &'a SeqIdResolver<S>,
        request: &'a ResolveRequest,
        started_at: Instant,
    ) -> Self {
        Self {
            resolver,
            request,
            stage: ResolveStage::Init,
            secondary_index: 0,
            last_primary: None,
            queries_issued: 0,
            started_at,
        }
    }

    /// Drives the cascade to its terminal outcome.
    ///
    /// Exactly one terminal is produced per attempt: a finished outcome
    /// (resolved, not-resolved or cancelled) or an error. Cancellation is
    /// re-checked before every fetch.
    pub(super) async fn run(mut self) -> Result<ResolutionOutcome, ResolveError> {
        loop {
            if self.request.cancel.is_cancelled() {
                return Ok(self.finish(ResolutionSource::Cancelled, None));
            }

            let stage = mem::replace(&mut self.stage, ResolveStage::Finished);
            let step = match stage {
                ResolveStage::Init => {
                    self.stage = entry_stage(&self.request.composed);
                    Ok(None)
                }
                ResolveStage::PrimaryLookup => self.primary_lookup().await,
                ResolveStage::SecondarySynonymLoop => self.synonym_step().await,
                ResolveStage::PostSynonymPrimaryLookup(skeleton) => {
                    self.confirm_synonym(skeleton).await
                }
                ResolveStage::AsIsFallback => self.as_is_lookup().await,
                ResolveStage::AsIsModifiedFallback(as_is) => self.modified_lookup(as_is).await,
                ResolveStage::Finished => {
                    Ok(Some(self.finish(ResolutionSource::NotResolved, None)))
                }
            };

            match step {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => {}
                Err(Interrupt::Cancelled) => {
                    return Ok(self.finish(ResolutionSource::Cancelled, None));
                }
                Err(Interrupt::Failed(error)) => return Err(error),
            }
        }
    }

    /// One primary-table query on the composed candidate, with the type
    /// filter applied. A zero-row result under an INSDC type filter earns a
    /// single type-relaxed retry within the same stage. Whatever happens,
    /// the successor stage is the synonym loop.
    async fn primary_lookup(&mut self) -> StepResult {
        let composed = &self.request.composed;
        let Some(accession) = primary_candidate(composed).map(str::to_string) else {
            self.stage = ResolveStage::SecondarySynonymLoop;
            return Ok(None);
        };

        let query = BioseqInfoQuery {
            accession,
            version: composed.version,
            seq_id_type: composed.seq_id_type,
            gi: None,
        };
        self.last_primary = Some((query.accession.clone(), query.seq_id_type));
        let rows = self.fetch_bioseq_info(&query).await?;
        self.stage = ResolveStage::SecondarySynonymLoop;

        match disambiguate(rows, query.version) {
            RowMatch::Unique(record) => {
                Ok(Some(self.finish(ResolutionSource::PrimaryTable, Some(record))))
            }
            RowMatch::Missing if self.insdc_retry_applies(&query) => {
                let retry = query.untyped();
                let rows = self.fetch_bioseq_info(&retry).await?;
                match disambiguate(rows, retry.version) {
                    RowMatch::Unique(record) => {
                        Ok(Some(self.finish(ResolutionSource::PrimaryTable, Some(record))))
                    }
                    RowMatch::Missing | RowMatch::Ambiguous(_) => Ok(None),
                }
            }
            RowMatch::Missing | RowMatch::Ambiguous(_) => Ok(None),
        }
    }

    /// One synonym-table query for the next frozen secondary candidate. A
    /// unique mapping either finishes the attempt outright or, when the
    /// policy distrusts the skeleton, branches into the confirming primary
    /// read. Zero or multiple rows move on to the next candidate.
    async fn synonym_step(&mut self) -> StepResult {
        let composed = &self.request.composed;
        let Some(secondary_id) = composed.secondary_ids.get(self.secondary_index).cloned() else {
            self.stage = ResolveStage::AsIsFallback;
            return Ok(None);
        };
        self.secondary_index += 1;
        self.stage = ResolveStage::SecondarySynonymLoop;

        let query = SynonymQuery {
            secondary_id,
            seq_id_type: composed.seq_id_type,
        };
        let rows = self.fetch_synonyms(&query).await?;
        match disambiguate(rows, composed.version) {
            RowMatch::Unique(row) => {
                let skeleton = BioseqInfo::from_synonym(&row);
                if self.resolver.policy.needs_primary_confirmation(&skeleton) {
                    self.stage = ResolveStage::PostSynonymPrimaryLookup(skeleton);
                    Ok(None)
                } else {
                    Ok(Some(
                        self.finish(ResolutionSource::SynonymTable, Some(skeleton)),
                    ))
                }
            }
            RowMatch::Missing | RowMatch::Ambiguous(_) => Ok(None),
        }
    }

    /// Confirming primary read for an adopted skeleton, type filter on.
    ///
    /// Inside this branch the two tables are expected to agree; after the
    /// INSDC retry (when applicable) both a missing and a duplicated record
    /// are hard data-integrity errors, never cascade continuations.
    async fn confirm_synonym(&mut self, skeleton: BioseqInfo) -> StepResult {
        let query = BioseqInfoQuery {
            accession: skeleton.accession.clone(),
            version: skeleton.version_opt(),
            seq_id_type: skeleton.seq_id_type_opt(),
            gi: skeleton.gi_opt(),
        };
        let rows = self.fetch_bioseq_info(&query).await?;
        match disambiguate(rows, query.version) {
            RowMatch::Unique(record) => {
                Ok(Some(self.finish(ResolutionSource::SynonymTable, Some(record))))
            }
            RowMatch::Missing if self.insdc_retry_applies(&query) => {
                let retry = query.untyped();
                let rows = self.fetch_bioseq_info(&retry).await?;
                match disambiguate(rows, retry.version) {
                    RowMatch::Unique(record) => {
                        Ok(Some(self.finish(ResolutionSource::SynonymTable, Some(record))))
                    }
                    RowMatch::Missing => Err(Interrupt::Failed(integrity_error(
                        &skeleton.accession,
                        IntegrityKind::NotFound,
                    ))),
                    RowMatch::Ambiguous(count) => Err(Interrupt::Failed(integrity_error(
                        &skeleton.accession,
                        IntegrityKind::MultipleFound { count },
                    ))),
                }
            }
            RowMatch::Missing => Err(Interrupt::Failed(integrity_error(
                &skeleton.accession,
                IntegrityKind::NotFound,
            ))),
            RowMatch::Ambiguous(count) => Err(Interrupt::Failed(integrity_error(
                &skeleton.accession,
                IntegrityKind::MultipleFound { count },
            ))),
        }
    }

    /// Retries the raw URL-supplied identifier, upper-cased, against the
    /// synonym table under the URL-supplied type. Skips the query when it
    /// would repeat the primary lookup verbatim. The successor stage is
    /// always the modified fallback, which inherits the normalized string.
    async fn as_is_lookup(&mut self) -> StepResult {
        let as_is = normalize_case(&self.request.raw_id);
        self.stage = ResolveStage::AsIsModifiedFallback(as_is.clone());

        if self.duplicates_primary_attempt(&as_is) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                id = %as_is,
                "as-is form already tried against the primary table, skipping"
            );
            return Ok(None);
        }

        let query = SynonymQuery {
            secondary_id: as_is,
            seq_id_type: self.request.url_seq_id_type,
        };
        let rows = self.fetch_synonyms(&query).await?;
        match disambiguate(rows, self.request.composed.version) {
            RowMatch::Unique(row) => Ok(Some(self.finish_on_synonym(&row))),
            RowMatch::Missing | RowMatch::Ambiguous(_) => Ok(None),
        }
    }

    /// Terminal fallback: strip all trailing separators when one is
    /// present, append exactly one otherwise, and try the synonym table a
    /// last time.
    async fn modified_lookup(&mut self, as_is: String) -> StepResult {
        let query = SynonymQuery {
            secondary_id: modified_fallback_form(&as_is),
            seq_id_type: self.request.url_seq_id_type,
        };
        let rows = self.fetch_synonyms(&query).await?;
        match disambiguate(rows, self.request.composed.version) {
            RowMatch::Unique(row) => Ok(Some(self.finish_on_synonym(&row))),
            RowMatch::Missing | RowMatch::Ambiguous(_) => Ok(None),
        }
    }

    fn duplicates_primary_attempt(&self, as_is: &str) -> bool {
        self.last_primary
            .as_ref()
            .is_some_and(|(accession, seq_id_type)| {
                accession.eq_ignore_ascii_case(as_is)
                    && *seq_id_type == self.request.url_seq_id_type
            })
    }

    fn insdc_retry_applies(&self, query: &BioseqInfoQuery) -> bool {
        query
            .seq_id_type
            .is_some_and(|seq_id_type| self.resolver.policy.is_insdc_type(seq_id_type))
    }

    async fn fetch_bioseq_info(
        &mut self,
        query: &BioseqInfoQuery,
    ) -> Result<Vec<BioseqInfo>, Interrupt> {
        if self.request.cancel.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        self.queries_issued += 1;
        self.resolver.telemetry.on_store_lookup(LookupTable::BioseqInfo);
        #[cfg(feature = "tracing")]
        tracing::trace!(accession = %query.accession, ?query.seq_id_type, "bioseq_info lookup");
        self.resolver
            .store
            .fetch_bioseq_info(query)
            .await
            .map_err(|error| Interrupt::Failed(error.into()))
    }

    async fn fetch_synonyms(&mut self, query: &SynonymQuery) -> Result<Vec<SynonymRecord>, Interrupt> {
        if self.request.cancel.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        self.queries_issued += 1;
        self.resolver.telemetry.on_store_lookup(LookupTable::Si2Csi);
        #[cfg(feature = "tracing")]
        tracing::trace!(secondary_id = %query.secondary_id, "si2csi lookup");
        self.resolver
            .store
            .fetch_synonyms(query)
            .await
            .map_err(|error| Interrupt::Failed(error.into()))
    }

    fn finish_on_synonym(&self, row: &SynonymRecord) -> ResolutionOutcome {
        self.finish(
            ResolutionSource::SynonymTable,
            Some(BioseqInfo::from_synonym(row)),
        )
    }

    fn finish(&self, source: ResolutionSource, record: Option<BioseqInfo>) -> ResolutionOutcome {
        let outcome = ResolutionOutcome::new(source, record, self.queries_issued, self.started_at);
        self.resolver.telemetry.on_resolution(source, outcome.elapsed());
        outcome
    }
}

fn integrity_error(accession: &str, kind: IntegrityKind) -> ResolveError {
    ResolveError::DataIntegrity {
        accession: accession.to_string(),
        kind,
    }
}
