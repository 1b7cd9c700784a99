use std::time::{Duration, Instant};

use tonic::metadata::{MetadataMap, MetadataValue};

use crate::context::{CallTelemetry, StatsContext};
use crate::propagation::{
    ServerStatsCodec, StatsContextCodec, TraceContextCodec, SERVER_STATS_HEADER,
    TAG_CONTEXT_HEADER, TRACE_CONTEXT_HEADER,
};
use crate::trace_context::TraceContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Init,
    AwaitingResponse,
    Done,
}

/// Client side of the propagation pair: owns the telemetry state of one
/// outbound call.
///
/// Create one per call, feed it the call's initial and trailing metadata as
/// they pass by, and read the measurements off it once the call completes.
///
/// ```
/// use grpc_telemetry::ClientCallInterceptor;
/// use tonic::metadata::MetadataMap;
///
/// let mut interceptor = ClientCallInterceptor::new("/echo.Echo/Ping", None);
/// let mut metadata = MetadataMap::new();
/// interceptor.on_send_initial_metadata(&mut metadata);
/// assert!(metadata.get_bin("grpc-trace-bin").is_some());
/// ```
#[derive(Debug)]
pub struct ClientCallInterceptor {
    telemetry: CallTelemetry,
    started_at: Instant,
    latency: Option<Duration>,
    state: State,
}

impl ClientCallInterceptor {
    /// Start interception for an outbound call to `method`.
    ///
    /// The call's local context is a child of `parent` when one is given,
    /// otherwise a fresh root.
    pub fn new(method: impl Into<String>, parent: Option<&TraceContext>) -> Self {
        let context = match parent {
            Some(parent) if parent.is_valid() => TraceContext::child_of(parent),
            _ => TraceContext::new_root(),
        };
        ClientCallInterceptor {
            telemetry: CallTelemetry::new(method, context),
            started_at: Instant::now(),
            latency: None,
            state: State::Init,
        }
    }

    /// Attach the ambient tag set to propagate with the call.
    pub fn with_stats_context(mut self, stats: StatsContext) -> Self {
        self.telemetry.stats = stats;
        self
    }

    /// Hook for the "send initial metadata" event: injects the trace and
    /// tag context headers.
    ///
    /// A header whose encode fails or is empty is omitted; the send itself
    /// is never blocked.
    pub fn on_send_initial_metadata(&mut self, metadata: &mut MetadataMap) {
        if self.state != State::Init {
            return;
        }
        self.state = State::AwaitingResponse;

        if let Some(buf) = TraceContextCodec::new().encode(&self.telemetry.context) {
            metadata.insert_bin(TRACE_CONTEXT_HEADER, MetadataValue::from_bytes(&buf));
        }
        if let Some(buf) = StatsContextCodec::new().encode(&self.telemetry.stats) {
            metadata.insert_bin(TAG_CONTEXT_HEADER, MetadataValue::from_bytes(&buf));
        }
    }

    /// Hook for the "receive trailing metadata" event: records the total
    /// call latency and pulls the server-measured elapsed time out of the
    /// trailers.
    ///
    /// The server stats header is removed whether or not it decodes, so the
    /// application never observes it. A missing or malformed header leaves
    /// the elapsed time unset and the call untouched.
    pub fn on_recv_trailing_metadata(&mut self, metadata: &mut MetadataMap) {
        if self.state == State::Done {
            return;
        }
        self.state = State::Done;
        self.latency = Some(self.started_at.elapsed());

        if let Some(value) = metadata.remove_bin(SERVER_STATS_HEADER) {
            if let Ok(bytes) = value.to_bytes() {
                if let Some(stats) = ServerStatsCodec::new().decode(&bytes) {
                    self.telemetry.elapsed = Some(stats.elapsed);
                }
            }
        }
    }

    /// The context propagated with this call.
    pub fn context(&self) -> &TraceContext {
        &self.telemetry.context
    }

    /// Server-reported processing time, when the trailers carried one.
    pub fn server_elapsed(&self) -> Option<Duration> {
        self.telemetry.elapsed
    }

    /// Total client-observed call latency, set once the trailers arrive.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// Consume the interceptor, yielding the telemetry it collected.
    pub fn into_telemetry(self) -> CallTelemetry {
        self.telemetry
    }
}
