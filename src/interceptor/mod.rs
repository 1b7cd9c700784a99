//! Call-scoped interceptors that move telemetry context through call
//! metadata.
//!
//! One interceptor instance belongs to exactly one call and is driven from
//! that call's thread of control; instances are thread-compatible, not
//! thread-safe. The hooks only add and remove the reserved `-bin` metadata
//! entries and record side-channel measurements, so the call's status and
//! payload always pass through untouched. Anything malformed on the wire
//! decodes as absent; a failed encode just omits its header.
//!
//! The hook methods map onto whatever the host stack offers: tonic
//! interceptors, tower middleware, or plain wrapper functions around a
//! generated client.

mod client;
mod server;

pub use client::ClientCallInterceptor;
pub use server::ServerCallInterceptor;
