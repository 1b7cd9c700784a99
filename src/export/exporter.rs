//! The exporter wired against the hosted collector endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, ClientTlsConfig};
use tonic::Request;

use crate::export::{encoder, ExportOutcome, ExportResult, ExportTransport, SpanExporter};
use crate::span::SpanData;
use crate::Error;

/// Default collector endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cloudtrace.googleapis.com";

/// Default per-request deadline.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(3);

/// Decorates outgoing collector requests with credentials.
///
/// The exporter calls `authorize` once per batch, immediately before the
/// request is sent.
#[async_trait]
pub trait Authorizer: Send + Sync + 'static {
    /// The error this authorizer can produce.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Attach credentials to the request.
    async fn authorize<T: Send + Sync>(
        &self,
        request: &mut Request<T>,
    ) -> Result<(), Self::Error>;
}

/// Authorizer for collectors that need no credentials, such as a local
/// agent or a test double.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuthorizer;

#[async_trait]
impl Authorizer for NoopAuthorizer {
    type Error = std::convert::Infallible;

    async fn authorize<T: Send + Sync>(
        &self,
        _request: &mut Request<T>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Authorizer that attaches a fixed bearer token to every request.
#[derive(Clone)]
pub struct StaticTokenAuthorizer {
    header: MetadataValue<Ascii>,
}

impl StaticTokenAuthorizer {
    /// Build an authorizer from a bearer token.
    ///
    /// Fails when the token contains bytes that are not valid in a
    /// metadata value.
    pub fn new(token: &str) -> Result<Self, Error> {
        let header = MetadataValue::try_from(format!("Bearer {token}"))
            .map_err(|e| Error::Authorizer(Box::new(e)))?;
        Ok(StaticTokenAuthorizer { header })
    }
}

impl fmt::Debug for StaticTokenAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenAuthorizer")
            .field("header", &"(redacted)")
            .finish()
    }
}

#[async_trait]
impl Authorizer for StaticTokenAuthorizer {
    type Error = std::convert::Infallible;

    async fn authorize<T: Send + Sync>(
        &self,
        request: &mut Request<T>,
    ) -> Result<(), Self::Error> {
        request
            .metadata_mut()
            .insert("authorization", self.header.clone());
        Ok(())
    }
}

/// Helper type to configure and build a [`TraceExporter`].
///
/// Everything here is read once at `build` time; the exporter's
/// configuration is immutable afterwards. Build the exporter once during
/// process startup and hand it to whatever component drives flushes.
#[derive(Clone, Debug, Default)]
pub struct TraceExporterBuilder {
    endpoint: Option<String>,
    deadline: Option<Duration>,
    channel: Option<Channel>,
}

impl TraceExporterBuilder {
    /// Override the collector endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the per-request deadline.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Use an already-configured channel instead of connecting to the
    /// endpoint. Useful for tests and custom transport setups.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Connect to the collector and build the exporter.
    pub async fn build<A: Authorizer>(
        self,
        authorizer: A,
        project_id: impl Into<String>,
    ) -> Result<TraceExporter<A>, Error> {
        let deadline = self.deadline.unwrap_or(DEFAULT_DEADLINE);
        let channel = match self.channel {
            Some(channel) => channel,
            None => {
                let endpoint = self
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
                Channel::from_shared(endpoint)
                    .map_err(|e| Error::Transport(e.into()))?
                    .tls_config(ClientTlsConfig::new().with_native_roots())
                    .map_err(|e| Error::Transport(e.into()))?
                    .timeout(deadline)
                    .connect_timeout(deadline)
                    .connect()
                    .await
                    .map_err(|e| Error::Transport(e.into()))?
            }
        };
        Ok(TraceExporter {
            transport: ExportTransport::new(channel, deadline),
            authorizer,
            project_id: project_id.into(),
        })
    }
}

/// Exports completed spans to the trace collector.
///
/// One instance serves the whole process: the destination configuration is
/// fixed at build time and only read afterwards. Each `export` call encodes
/// its batch, drops spans that fail validation, and issues a single
/// deadline-bounded RPC. A transport failure loses the batch and is
/// reported only to the caller.
pub struct TraceExporter<A> {
    transport: ExportTransport,
    authorizer: A,
    project_id: String,
}

impl TraceExporter<NoopAuthorizer> {
    /// Start configuring an exporter.
    pub fn builder() -> TraceExporterBuilder {
        TraceExporterBuilder::default()
    }
}

impl<A: Authorizer> TraceExporter<A> {
    /// The project the exporter writes to.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Encode and send one batch of completed spans.
    pub async fn export(&mut self, batch: Vec<SpanData>) -> ExportResult {
        let (request, dropped) = encoder::encode_batch(&self.project_id, &batch);
        let exported = request.spans.len();
        if exported == 0 {
            return Ok(ExportOutcome { exported, dropped });
        }

        let mut request = Request::new(request);
        self.authorizer
            .authorize(&mut request)
            .await
            .map_err(|e| Error::Authorizer(Box::new(e)))?;
        self.transport.send(request).await?;
        Ok(ExportOutcome { exported, dropped })
    }
}

impl<A> fmt::Debug for TraceExporter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceExporter")
            .field("transport", &self.transport)
            .field("project_id", &self.project_id)
            .finish()
    }
}

#[async_trait]
impl<A: Authorizer> SpanExporter for TraceExporter<A> {
    async fn export(&mut self, batch: Vec<SpanData>) -> ExportResult {
        TraceExporter::export(self, batch).await
    }
}
