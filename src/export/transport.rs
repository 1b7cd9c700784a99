//! Single-shot delivery of an encoded batch to the collector.

use std::time::Duration;

use tonic::transport::Channel;
use tonic::Request;
use tracing::{debug, warn};

use crate::proto::devtools::cloudtrace::v2::{
    trace_service_client::TraceServiceClient, BatchWriteSpansRequest,
};
use crate::Error;

/// Sends one encoded batch per call over a bounded-deadline RPC.
///
/// There is no retry, queueing, or buffering behind this type: a failed
/// send loses that batch's spans. That trade-off is deliberate for
/// best-effort telemetry; callers that need durability must buffer above
/// this layer. `send` blocks its calling task for at most the configured
/// deadline.
#[derive(Debug)]
pub struct ExportTransport {
    client: TraceServiceClient<Channel>,
    deadline: Duration,
}

impl ExportTransport {
    /// Wrap a connected channel with a per-request deadline.
    pub fn new(channel: Channel, deadline: Duration) -> Self {
        ExportTransport {
            client: TraceServiceClient::new(channel),
            deadline,
        }
    }

    /// The deadline applied to each outgoing request.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Issue the `BatchWriteSpans` RPC for one batch.
    ///
    /// Any non-OK status, including a blown deadline, comes back as
    /// [`Error::Transport`]; the request is not reissued.
    pub async fn send(&mut self, request: Request<BatchWriteSpansRequest>) -> Result<(), Error> {
        let mut request = request;
        request.set_timeout(self.deadline);
        debug!(spans = request.get_ref().spans.len(), "sending span batch");
        match self.client.batch_write_spans(request).await {
            Ok(_) => Ok(()),
            Err(status) => {
                warn!(%status, "span batch write failed");
                Err(Error::Transport(Box::new(status)))
            }
        }
    }
}
