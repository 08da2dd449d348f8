//! Terminal delivery contract back into the orchestrating request context.

use seqres::{ResolutionOutcome, ResolveError};
use std::time::Instant;

/// Receiver of a resolution attempt's terminal result.
///
/// For every request exactly one of the two methods is invoked, exactly
/// once: `on_resolution_finished` for resolved, not-resolved and cancelled
/// outcomes, `on_resolution_error` for store failures and data-integrity
/// errors. The engine enforces this structurally - there is a single
/// delivery site and the attempt owns its only in-flight fetch, so a late
/// store completion cannot fire after the request was finalized.
pub trait ResolutionSink {
    fn on_resolution_finished(&mut self, outcome: ResolutionOutcome);

    /// `started_at` lets the context account latency for failed attempts
    /// the same way [`ResolutionOutcome`] does for finished ones.
    fn on_resolution_error(&mut self, error: ResolveError, started_at: Instant);
}
