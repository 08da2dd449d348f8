//! # Resolver Telemetry
//!
//! The engine reports to an injected [`ResolverTelemetry`] capability
//! rather than a global registry, so embedders can wire it into whatever
//! metrics pipeline the surrounding service runs and tests can leave it as
//! a no-op.
//!
//! [`CounterTelemetry`] is the provided implementation: a set of atomic
//! counters with a consistent [`snapshot`](CounterTelemetry::snapshot),
//! enough for diagnostics without an exporter.

use seqres::ResolutionSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Which logical table a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    BioseqInfo,
    Si2Csi,
}

/// Injected observer of engine activity. All methods default to no-ops.
pub trait ResolverTelemetry: Send + Sync {
    /// One store query was issued against `table`.
    fn on_store_lookup(&self, _table: LookupTable) {}

    /// One cache probe against `table`; `conclusive` is false when the
    /// probe answered unknown and the store had to be consulted.
    fn on_cache_probe(&self, _table: LookupTable, _conclusive: bool) {}

    /// A resolution attempt reached a terminal outcome.
    fn on_resolution(&self, _source: ResolutionSource, _elapsed: Duration) {}

    /// A resolution attempt ended in a store or data-integrity error.
    fn on_error(&self) {}
}

/// No-op telemetry for tests and embedders that do not observe the engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl ResolverTelemetry for NoopTelemetry {}

/// Atomic-counter telemetry.
#[derive(Debug, Default)]
pub struct CounterTelemetry {
    bioseq_info_lookups: AtomicU64,
    si2csi_lookups: AtomicU64,
    cache_probes: AtomicU64,
    cache_inconclusive: AtomicU64,
    resolved: AtomicU64,
    not_resolved: AtomicU64,
    cancelled: AtomicU64,
    errors: AtomicU64,
    busy_micros: AtomicU64,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub bioseq_info_lookups: u64,
    pub si2csi_lookups: u64,
    pub cache_probes: u64,
    pub cache_inconclusive: u64,
    pub resolved: u64,
    pub not_resolved: u64,
    pub cancelled: u64,
    pub errors: u64,
    pub busy_micros: u64,
}

impl CounterTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            bioseq_info_lookups: self.bioseq_info_lookups.load(Ordering::Relaxed),
            si2csi_lookups: self.si2csi_lookups.load(Ordering::Relaxed),
            cache_probes: self.cache_probes.load(Ordering::Relaxed),
            cache_inconclusive: self.cache_inconclusive.load(Ordering::Relaxed),
            resolved: self.resolved.load(Ordering::Relaxed),
            not_resolved: self.not_resolved.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            busy_micros: self.busy_micros.load(Ordering::Relaxed),
        }
    }
}

impl ResolverTelemetry for CounterTelemetry {
    fn on_store_lookup(&self, table: LookupTable) {
        let counter = match table {
            LookupTable::BioseqInfo => &self.bioseq_info_lookups,
            LookupTable::Si2Csi => &self.si2csi_lookups,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn on_cache_probe(&self, _table: LookupTable, conclusive: bool) {
        self.cache_probes.fetch_add(1, Ordering::Relaxed);
        if !conclusive {
            self.cache_inconclusive.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_resolution(&self, source: ResolutionSource, elapsed: Duration) {
        let counter = match source {
            ResolutionSource::NotResolved => &self.not_resolved,
            ResolutionSource::Cancelled => &self.cancelled,
            _ => &self.resolved,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.busy_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    fn on_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_activity() {
        let telemetry = CounterTelemetry::new();
        telemetry.on_store_lookup(LookupTable::BioseqInfo);
        telemetry.on_store_lookup(LookupTable::Si2Csi);
        telemetry.on_store_lookup(LookupTable::Si2Csi);
        telemetry.on_cache_probe(LookupTable::BioseqInfo, true);
        telemetry.on_cache_probe(LookupTable::BioseqInfo, false);
        telemetry.on_resolution(ResolutionSource::PrimaryTable, Duration::from_micros(250));
        telemetry.on_resolution(ResolutionSource::NotResolved, Duration::from_micros(50));
        telemetry.on_resolution(ResolutionSource::Cancelled, Duration::ZERO);
        telemetry.on_error();

        let snapshot = telemetry.snapshot();
        assert_eq!(snapshot.bioseq_info_lookups, 1);
        assert_eq!(snapshot.si2csi_lookups, 2);
        assert_eq!(snapshot.cache_probes, 2);
        assert_eq!(snapshot.cache_inconclusive, 1);
        assert_eq!(snapshot.resolved, 1);
        assert_eq!(snapshot.not_resolved, 1);
        assert_eq!(snapshot.cancelled, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.busy_micros, 300);
    }
}
