//! # Seq-Id Resolver Front Door
//!
//! [`SeqIdResolver`] turns one [`ResolveRequest`] into one terminal result.
//! Internally it runs a deterministic cascade of lookups - primary
//! accession, secondary synonyms, an as-is retry of the raw identifier and
//! a punctuation-normalized retry - against two capabilities:
//!
//! - a [`SequenceStore`], the asynchronous row-fetch capability over the
//!   two backing tables, and
//! - optionally a [`ResolutionCache`], probed first by a synchronous
//!   rendition of the same cascade.
//!
//! The cache path and the store path share the candidate lists and the
//! disambiguation policy, so for any identifier the path taken never
//! changes the resolved record, only the cost. A probe the cache cannot
//! answer conclusively hands the whole request to the async engine.
//!
//! ## Responsibilities
//!
//! - Drive the stage machine without ever blocking a thread or holding two
//!   fetches in flight.
//! - Check the request's cancellation token before every fetch and finish
//!   with a distinguished cancelled outcome.
//! - Deliver exactly one terminal per request, either through the returned
//!   `Result` or through a [`ResolutionSink`].
//! - Report activity to the injected [`ResolverTelemetry`].

mod attempt;
mod cache_path;

use crate::cache::ResolutionCache;
use crate::config::ResolverOptions;
use crate::request::ResolveRequest;
use crate::sink::ResolutionSink;
use crate::store::SequenceStore;
use crate::telemetry::{NoopTelemetry, ResolverTelemetry};
use attempt::ResolutionAttempt;
use seqres::{NcbiSeqIdPolicy, ResolutionOutcome, Result, SeqIdPolicy};
use std::sync::Arc;
use std::time::Instant;

/// Asynchronous seq-id resolution engine.
///
/// One instance serves many concurrent requests; each request gets its own
/// attempt state and owns it exclusively, so there is no shared mutable
/// state between resolutions.
pub struct SeqIdResolver<S> {
    pub(crate) store: S,
    pub(crate) cache: Option<Arc<dyn ResolutionCache>>,
    pub(crate) policy: Arc<dyn SeqIdPolicy>,
    pub(crate) telemetry: Arc<dyn ResolverTelemetry>,
    pub(crate) options: ResolverOptions,
}

impl<S: SequenceStore> SeqIdResolver<S> {
    /// A resolver over `store` with the default policy, no cache and no
    /// telemetry.
    pub fn new(store: S) -> Self {
        Self::builder(store).build()
    }

    pub fn builder(store: S) -> SeqIdResolverBuilder<S> {
        SeqIdResolverBuilder::new(store)
    }

    /// Resolves one request to its terminal outcome.
    ///
    /// Tries the cache path first when one is configured, then the store
    /// cascade. Transient lookup ambiguity never surfaces here; the only
    /// errors are store failures and data-integrity disagreements.
    pub async fn resolve(&self, request: ResolveRequest) -> Result<ResolutionOutcome> {
        let started_at = Instant::now();

        if self.options.cache_first {
            if let Some(cache) = self.cache.as_deref() {
                if let Some(outcome) =
                    cache_path::resolve_via_cache(self, cache, &request, started_at)
                {
                    return Ok(outcome);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(id = %request.raw_id, "cache inconclusive, continuing with the store");
            }
        }

        let result = ResolutionAttempt::new(self, &request, started_at).run().await;
        if result.is_err() {
            self.telemetry.on_error();
        }
        result
    }

    /// Resolves one request and delivers the terminal through `sink`.
    ///
    /// Exactly one of the sink's methods is invoked, exactly once.
    pub async fn resolve_into<K>(&self, request: ResolveRequest, sink: &mut K)
    where
        K: ResolutionSink + ?Sized,
    {
        let started_at = Instant::now();
        match self.resolve(request).await {
            Ok(outcome) => sink.on_resolution_finished(outcome),
            Err(error) => sink.on_resolution_error(error, started_at),
        }
    }
}

/// Builder wiring the resolver's collaborators.
pub struct SeqIdResolverBuilder<S> {
    store: S,
    cache: Option<Arc<dyn ResolutionCache>>,
    policy: Arc<dyn SeqIdPolicy>,
    telemetry: Arc<dyn ResolverTelemetry>,
    options: ResolverOptions,
}

impl<S> SeqIdResolverBuilder<S> {
    fn new(store: S) -> Self {
        Self {
            store,
            cache: None,
            policy: Arc::new(NcbiSeqIdPolicy),
            telemetry: Arc::new(NoopTelemetry),
            options: ResolverOptions::default(),
        }
    }

    /// Probes this cache before touching the store.
    pub fn cache(mut self, cache: Arc<dyn ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the seq-id type policy (INSDC membership, confirmation).
    pub fn policy(mut self, policy: Arc<dyn SeqIdPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn ResolverTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> SeqIdResolver<S> {
        SeqIdResolver {
            store: self.store,
            cache: self.cache,
            policy: self.policy,
            telemetry: self.telemetry,
            options: self.options,
        }
    }
}
