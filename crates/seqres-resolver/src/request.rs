//! Per-request input to the resolution engine.

use seqres::ComposedSeqId;
use tokio_util::sync::CancellationToken;

/// Everything one resolution attempt needs from the orchestrating request
/// context: the raw identifier as supplied in the URL, the type hint that
/// accompanied it, the frozen decomposition, and the request's cancellation
/// token.
///
/// The candidate lists inside `composed` are frozen at construction; the
/// engine only reads them.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub raw_id: String,
    /// Seq-id type as supplied alongside the raw identifier, used by the
    /// as-is fallback stages (the cascade proper uses the effective type
    /// from `composed`).
    pub url_seq_id_type: Option<i16>,
    pub composed: ComposedSeqId,
    pub cancel: CancellationToken,
}

impl ResolveRequest {
    pub fn new(
        raw_id: impl Into<String>,
        url_seq_id_type: Option<i16>,
        composed: ComposedSeqId,
    ) -> Self {
        Self {
            raw_id: raw_id.into(),
            url_seq_id_type,
            composed,
            cancel: CancellationToken::new(),
        }
    }

    /// Ties this request to an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
