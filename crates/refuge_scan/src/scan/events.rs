//! Event types and sinks for observing scans.
//!
//! Presenters subscribe to [`ScanEvent`]s instead of reaching into the
//! pipeline: scoring and filtering stay plain data transformations, and
//! presentation is a projection over [`crate::scan::ScanResult`] plus
//! these progress notifications.
use crate::geo::BoundingBox;
use crate::scan::ScanResult;

/// Describes events emitted during a scan.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Emitted when a scan begins.
    ScanStarted {
        /// Monotonic scan token; later tokens supersede earlier ones.
        token: u64,
        /// The region being queried.
        region: BoundingBox,
    },

    /// Emitted when the feature source answered.
    FeaturesFetched {
        token: u64,
        /// Raw element count before normalization.
        element_count: usize,
    },

    /// Emitted when the pipeline switches to synthesized zones.
    FallbackEngaged {
        token: u64,
        /// Why the real-structure path produced nothing.
        reason: String,
    },

    /// Emitted when a scan completes with results.
    ScanFinished { token: u64, result: ScanResult },

    /// Non-fatal warning generated during a scan.
    Warning { context: String, message: String },
}

/// A generic event sink that accepts [`ScanEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: ScanEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: ScanEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(ScanEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(ScanEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(ScanEvent),
{
    #[inline]
    fn send(&mut self, event: ScanEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<ScanEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<ScanEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[ScanEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: ScanEvent) {
        self.events.push(event);
    }
}
