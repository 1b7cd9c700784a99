//! Conversion and delivery of completed spans to the trace collector.

use async_trait::async_trait;

use crate::span::SpanData;
use crate::Error;

pub mod encoder;
mod exporter;
mod transport;

pub use encoder::{encode_batch, encode_span};
pub use exporter::{
    Authorizer, NoopAuthorizer, StaticTokenAuthorizer, TraceExporter, TraceExporterBuilder,
    DEFAULT_DEADLINE, DEFAULT_ENDPOINT,
};
pub use transport::ExportTransport;

/// What happened to a batch handed to [`SpanExporter::export`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Spans delivered to the collector.
    pub exported: usize,
    /// Spans dropped by encoding validation before the request was sent.
    pub dropped: usize,
}

/// Describes the result of an export.
pub type ExportResult = Result<ExportOutcome, Error>;

/// Interface between the span store's flush trigger and a concrete
/// exporter.
///
/// Implementations serialize and transmit the batch on the calling task;
/// they must bound how long a call can take, and any retrying is their
/// responsibility (the exporter in this crate does none). Spans keep their
/// input order within a batch; nothing is guaranteed across batches.
#[async_trait]
pub trait SpanExporter: Send + Sync + std::fmt::Debug {
    /// Exports a batch of completed spans.
    async fn export(&mut self, batch: Vec<SpanData>) -> ExportResult;
}
