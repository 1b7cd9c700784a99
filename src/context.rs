//! Per-call telemetry state carried by the interceptors.

use std::time::Duration;

use crate::trace_context::TraceContext;

/// An opaque, already-encoded key/value tag set propagated alongside the
/// trace context.
///
/// The blob is pass-through payload: this crate bounds its size and moves it
/// across the wire but never interprets its contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsContext(Vec<u8>);

impl StatsContext {
    /// Wrap an encoded tag set.
    pub fn new(bytes: Vec<u8>) -> Self {
        StatsContext(bytes)
    }

    /// The encoded tag bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the encoded tag set in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no tags are carried.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for StatsContext {
    fn from(bytes: Vec<u8>) -> Self {
        StatsContext(bytes)
    }
}

/// Server-measured processing time, reported back to the client in trailing
/// metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServerStats {
    /// Time between the server seeing the call and sending its trailers.
    pub elapsed: Duration,
}

impl ServerStats {
    /// Record an elapsed processing time.
    pub fn new(elapsed: Duration) -> Self {
        ServerStats { elapsed }
    }
}

/// Everything one interceptor instance records about one call.
///
/// Created at call start, mutated only by the interceptor owning the call,
/// and dropped when the call completes. Instances are never shared between
/// calls; access is single-threaded by construction (thread-compatible, not
/// thread-safe).
#[derive(Clone, Debug)]
pub struct CallTelemetry {
    /// Fully qualified method path, e.g. `/package.Service/Method`.
    pub method: String,
    /// The propagated context decoded from the peer, when present and valid.
    pub inbound_context: Option<TraceContext>,
    /// The context local to this call: a child of `inbound_context` or a
    /// fresh root.
    pub context: TraceContext,
    /// Tag set travelling with the call.
    pub stats: StatsContext,
    /// Measured elapsed time. On the server this is local processing time;
    /// on the client it is the server-reported value from the trailers.
    pub elapsed: Option<Duration>,
}

impl CallTelemetry {
    /// Start a telemetry record for a call with the given local context.
    pub fn new(method: impl Into<String>, context: TraceContext) -> Self {
        CallTelemetry {
            method: method.into(),
            inbound_context: None,
            context,
            stats: StatsContext::default(),
            elapsed: None,
        }
    }
}
