use std::time::Instant;

use tonic::metadata::{MetadataMap, MetadataValue};

use crate::context::{CallTelemetry, ServerStats};
use crate::propagation::{
    ServerStatsCodec, StatsContextCodec, TraceContextCodec, SERVER_STATS_HEADER,
    TAG_CONTEXT_HEADER, TRACE_CONTEXT_HEADER,
};
use crate::trace_context::TraceContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitingInitialMetadata,
    Active,
    Done,
}

/// Server side of the propagation pair: owns the telemetry state of one
/// inbound call.
///
/// The initial-metadata hook strips the propagation headers before the
/// application sees the metadata and publishes a call context for the
/// span-recording layer; the trailing-metadata hook reports the measured
/// processing time back to the client.
#[derive(Debug)]
pub struct ServerCallInterceptor {
    started_at: Instant,
    telemetry: Option<CallTelemetry>,
    state: State,
}

impl ServerCallInterceptor {
    /// Start interception for an inbound call; records the start instant.
    pub fn new() -> Self {
        ServerCallInterceptor {
            started_at: Instant::now(),
            telemetry: None,
            state: State::AwaitingInitialMetadata,
        }
    }

    /// Hook for the "receive initial metadata" event.
    ///
    /// `path` is the request's method path (left in the request for the
    /// application). The trace and tag context headers are removed from
    /// `metadata` unconditionally and decoded fail-open: the returned call
    /// context is a child of a valid inbound context, or a fresh root when
    /// the header is missing or malformed. Hand it to the span-recording
    /// layer so application spans join the caller's trace.
    pub fn on_recv_initial_metadata(
        &mut self,
        path: &str,
        metadata: &mut MetadataMap,
    ) -> &TraceContext {
        if self.state == State::AwaitingInitialMetadata {
            self.state = State::Active;
        }

        let telemetry = self.telemetry.get_or_insert_with(|| {
            let inbound = metadata
                .remove_bin(TRACE_CONTEXT_HEADER)
                .and_then(|value| value.to_bytes().ok())
                .and_then(|bytes| TraceContextCodec::new().decode(&bytes));
            let stats = metadata
                .remove_bin(TAG_CONTEXT_HEADER)
                .and_then(|value| value.to_bytes().ok())
                .and_then(|bytes| StatsContextCodec::new().decode(&bytes))
                .unwrap_or_default();

            let context = match &inbound {
                Some(parent) => TraceContext::child_of(parent),
                None => TraceContext::new_root(),
            };
            let mut telemetry = CallTelemetry::new(path, context);
            telemetry.inbound_context = inbound;
            telemetry.stats = stats;
            telemetry
        });
        &telemetry.context
    }

    /// Hook for the "send trailing metadata" event: appends the measured
    /// elapsed time as the server stats header.
    ///
    /// The server stats encoding is fixed-length and always within the
    /// header bound, so the header is appended unconditionally; a client
    /// that does not understand it strips or ignores it.
    pub fn on_send_trailing_metadata(&mut self, metadata: &mut MetadataMap) {
        if self.state == State::Done {
            return;
        }
        self.state = State::Done;

        let stats = ServerStats::new(self.started_at.elapsed());
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.elapsed = Some(stats.elapsed);
        }
        let buf = ServerStatsCodec::new().encode(&stats);
        metadata.insert_bin(SERVER_STATS_HEADER, MetadataValue::from_bytes(&buf));
    }

    /// The call context published for span recording; `None` until the
    /// initial metadata has been seen. Always a valid context after that,
    /// even when the request carried no usable propagation header.
    pub fn context(&self) -> Option<&TraceContext> {
        self.telemetry.as_ref().map(|telemetry| &telemetry.context)
    }

    /// The propagated context decoded from the request, when present.
    pub fn inbound_context(&self) -> Option<&TraceContext> {
        self.telemetry.as_ref()?.inbound_context.as_ref()
    }

    /// Consume the interceptor, yielding the telemetry it collected.
    pub fn into_telemetry(mut self) -> Option<CallTelemetry> {
        self.telemetry.take()
    }
}

impl Default for ServerCallInterceptor {
    fn default() -> Self {
        ServerCallInterceptor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StatsContext;

    const PATH: &str = "/echo.Echo/Ping";

    fn request_metadata(context: &TraceContext, tags: &[u8]) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        let buf = TraceContextCodec::new().encode(context).unwrap();
        metadata.insert_bin(TRACE_CONTEXT_HEADER, MetadataValue::from_bytes(&buf));
        if !tags.is_empty() {
            metadata.insert_bin(TAG_CONTEXT_HEADER, MetadataValue::from_bytes(tags));
        }
        metadata
    }

    #[test]
    fn derives_child_of_inbound_context() {
        let client_context = TraceContext::new_root().with_sampled(true);
        let mut metadata = request_metadata(&client_context, &[9, 9]);

        let mut interceptor = ServerCallInterceptor::new();
        let context = *interceptor.on_recv_initial_metadata(PATH, &mut metadata);

        assert_eq!(context.trace_id(), client_context.trace_id());
        assert_ne!(context.span_id(), client_context.span_id());
        assert!(context.is_sampled());
        assert_eq!(interceptor.inbound_context(), Some(&client_context));

        let telemetry = interceptor.into_telemetry().unwrap();
        assert_eq!(telemetry.method, PATH);
        assert_eq!(telemetry.stats, StatsContext::new(vec![9, 9]));
    }

    #[test]
    fn strips_propagation_headers() {
        let client_context = TraceContext::new_root();
        let mut metadata = request_metadata(&client_context, &[1]);

        let mut interceptor = ServerCallInterceptor::new();
        interceptor.on_recv_initial_metadata(PATH, &mut metadata);

        assert!(metadata.get_bin(TRACE_CONTEXT_HEADER).is_none());
        assert!(metadata.get_bin(TAG_CONTEXT_HEADER).is_none());
    }

    #[test]
    fn missing_header_starts_a_fresh_root() {
        let mut interceptor = ServerCallInterceptor::new();
        let context = *interceptor.on_recv_initial_metadata(PATH, &mut MetadataMap::new());

        assert!(context.is_valid());
        assert!(!context.is_sampled());
        assert_eq!(interceptor.inbound_context(), None);
    }

    #[test]
    fn malformed_header_starts_a_fresh_root() {
        let mut metadata = MetadataMap::new();
        metadata.insert_bin(TRACE_CONTEXT_HEADER, MetadataValue::from_bytes(&[0xba, 0xad]));

        let mut interceptor = ServerCallInterceptor::new();
        let context = *interceptor.on_recv_initial_metadata(PATH, &mut metadata);

        assert!(context.is_valid());
        assert_eq!(interceptor.inbound_context(), None);
        assert!(metadata.get_bin(TRACE_CONTEXT_HEADER).is_none());
    }

    #[test]
    fn appends_server_stats_to_trailers() {
        let mut interceptor = ServerCallInterceptor::new();
        interceptor.on_recv_initial_metadata(PATH, &mut MetadataMap::new());

        let mut trailers = MetadataMap::new();
        interceptor.on_send_trailing_metadata(&mut trailers);

        let bytes = trailers
            .get_bin(SERVER_STATS_HEADER)
            .expect("server stats header missing")
            .to_bytes()
            .unwrap();
        let stats = ServerStatsCodec::new().decode(&bytes).unwrap();
        let telemetry = interceptor.into_telemetry().unwrap();
        assert_eq!(telemetry.elapsed, Some(stats.elapsed));
    }
}
