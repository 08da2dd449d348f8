//! Engine tuning knobs.

/// Options governing how the resolver front door behaves.
///
/// Everything here has a working default; construct with struct-update
/// syntax or through [`SeqIdResolverBuilder`](crate::SeqIdResolverBuilder).
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Try the synchronous cache path before constructing the async
    /// cascade. Only meaningful when a cache is configured; the answer is
    /// identical either way, only the cost differs.
    pub cache_first: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self { cache_first: true }
    }
}
