//! Distributed trace context propagation and Cloud Trace span export for
//! gRPC services.
//!
//! Two halves make up the crate:
//!
//! * **Propagation** — a [`ClientCallInterceptor`]/[`ServerCallInterceptor`]
//!   pair that carries trace and stats context across a call inside the
//!   reserved binary metadata headers (`grpc-trace-bin`, `grpc-tags-bin`)
//!   and feeds the server-measured elapsed time back to the client through
//!   `grpc-server-stats-bin`. The interceptors strip these headers before
//!   the application sees the metadata, and every decode fails open:
//!   telemetry never breaks application traffic.
//! * **Export** — a [`TraceExporter`] that converts completed [`SpanData`]
//!   records into `BatchWriteSpans` requests (truncating strings and
//!   validating timestamps along the way) and delivers each batch over a
//!   single deadline-bounded RPC, with no retries or buffering.
//!
//! Propagating a context across a call boundary looks like this on both
//! sides of the wire:
//!
//! ```
//! use grpc_telemetry::{ClientCallInterceptor, ServerCallInterceptor, TraceContext};
//! use tonic::metadata::MetadataMap;
//!
//! // Client side: derive a call context and inject it.
//! let ambient = TraceContext::new_root().with_sampled(true);
//! let mut client = ClientCallInterceptor::new("/echo.Echo/Ping", Some(&ambient));
//! let mut metadata = MetadataMap::new();
//! client.on_send_initial_metadata(&mut metadata);
//!
//! // Server side: extract it and derive the call's own context.
//! let mut server = ServerCallInterceptor::new();
//! let context = server.on_recv_initial_metadata("/echo.Echo/Ping", &mut metadata);
//! assert_eq!(context.trace_id(), client.context().trace_id());
//! assert_ne!(context.span_id(), client.context().span_id());
//! ```

#![warn(missing_docs)]

use thiserror::Error;

pub mod context;
pub mod export;
pub mod interceptor;
pub mod propagation;
#[allow(missing_docs)]
pub mod proto;
pub mod span;
pub mod trace_context;

pub use context::{CallTelemetry, ServerStats, StatsContext};
pub use export::{
    Authorizer, ExportOutcome, ExportResult, ExportTransport, NoopAuthorizer, SpanExporter,
    StaticTokenAuthorizer, TraceExporter, TraceExporterBuilder,
};
pub use interceptor::{ClientCallInterceptor, ServerCallInterceptor};
pub use propagation::{
    ServerStatsCodec, StatsContextCodec, TraceContextCodec, SERVER_STATS_HEADER,
    TAG_CONTEXT_HEADER, TRACE_CONTEXT_HEADER,
};
pub use span::SpanData;
pub use trace_context::{SpanId, TraceContext, TraceFlags, TraceId};

/// Errors surfaced by the export path.
///
/// Propagation never produces one of these: malformed headers decode as
/// absent and failed header encodes omit the header, so the only fallible
/// surface is exporting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured authorizer failed to produce credentials.
    #[error("authorizer error: {0}")]
    Authorizer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A span carried a timestamp outside the collector's representable
    /// calendar range.
    #[error("timestamp out of range: {seconds}s {nanos}ns")]
    InvalidTimestamp {
        /// Seconds since the Unix epoch.
        seconds: i64,
        /// Nanoseconds within the second.
        nanos: i32,
    },

    /// Connecting to the collector or delivering a batch failed.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}
