//! Binary codecs for the reserved call-metadata headers.
//!
//! Three binary headers cross the RPC boundary: the trace context and the
//! stats/tag context on requests, and the server-measured elapsed time on
//! responses. All three share the same framing idea, a format-version byte
//! followed by `(field id, fixed-length value)` tuples, and all three decode
//! fail-open: malformed input yields "absent", never an error on the call
//! path.

use std::time::Duration;

use crate::context::{ServerStats, StatsContext};
use crate::trace_context::{SpanId, TraceContext, TraceFlags, TraceId};

/// Request header carrying the binary trace context.
pub const TRACE_CONTEXT_HEADER: &str = "grpc-trace-bin";

/// Request header carrying the opaque stats/tag context.
pub const TAG_CONTEXT_HEADER: &str = "grpc-tags-bin";

/// Response header carrying the server-measured elapsed time.
pub const SERVER_STATS_HEADER: &str = "grpc-server-stats-bin";

/// Upper bound on an encoded tag context. Oversized tag sets are dropped
/// whole; truncating them could change their meaning.
pub const MAX_TAG_CONTEXT_LEN: usize = 2048;

/// Encoded length of a full trace context blob.
pub const TRACE_CONTEXT_LEN: usize = 29;

/// Encoded length of a server stats blob.
pub const SERVER_STATS_LEN: usize = 10;

const FORMAT_VERSION: u8 = 0;

const FIELD_TRACE_ID: u8 = 0;
const FIELD_SPAN_ID: u8 = 1;
const FIELD_TRACE_OPTIONS: u8 = 2;

const FIELD_ELAPSED_TIME: u8 = 0;

/// Serializes [`TraceContext`] values to and from the `grpc-trace-bin`
/// wire format.
///
/// Layout (version 0): `[version][0][trace id: 16][1][span id: 8][2][options: 1]`
/// with bit 0 of the options byte carrying the sampled flag.
#[derive(Debug, Default)]
pub struct TraceContextCodec {}

impl TraceContextCodec {
    /// Create a new trace context codec.
    pub fn new() -> Self {
        TraceContextCodec {}
    }

    /// Serializes a trace context into its binary header value.
    ///
    /// Returns `None` for an invalid context; the caller omits the header.
    pub fn encode(&self, context: &TraceContext) -> Option<[u8; TRACE_CONTEXT_LEN]> {
        if !context.is_valid() {
            return None;
        }
        let mut buf = [0u8; TRACE_CONTEXT_LEN];
        buf[0] = FORMAT_VERSION;
        buf[1] = FIELD_TRACE_ID;
        buf[2..18].copy_from_slice(&context.trace_id().to_bytes());
        buf[18] = FIELD_SPAN_ID;
        buf[19..27].copy_from_slice(&context.span_id().to_bytes());
        buf[27] = FIELD_TRACE_OPTIONS;
        buf[28] = context.trace_flags().to_u8();
        Some(buf)
    }

    /// Deserializes a trace context from a binary header value.
    ///
    /// Fails open: an unsupported version, a truncated field, or a zero id
    /// all yield `None`. An unknown field id ends parsing there; fields
    /// decoded up to that point are kept, so a well-formed prefix from a
    /// newer writer still produces a context.
    pub fn decode(&self, bytes: &[u8]) -> Option<TraceContext> {
        let (&version, mut rest) = bytes.split_first()?;
        if version != FORMAT_VERSION {
            return None;
        }

        let mut trace_id = None;
        let mut span_id = None;
        let mut options = 0u8;
        while let Some((&field_id, body)) = rest.split_first() {
            // Fixed lengths are known per field id; an id without a length
            // entry cannot be skipped, so parsing stops there.
            let len = match field_id {
                FIELD_TRACE_ID => 16,
                FIELD_SPAN_ID => 8,
                FIELD_TRACE_OPTIONS => 1,
                _ => break,
            };
            if body.len() < len {
                return None;
            }
            let (value, tail) = body.split_at(len);
            match field_id {
                FIELD_TRACE_ID => trace_id = Some(TraceId::from_bytes(value.try_into().ok()?)),
                FIELD_SPAN_ID => span_id = Some(SpanId::from_bytes(value.try_into().ok()?)),
                _ => options = value[0],
            }
            rest = tail;
        }

        let context = TraceContext::new(trace_id?, span_id?, TraceFlags::new(options));
        context.is_valid().then_some(context)
    }
}

/// Moves opaque stats/tag blobs to and from the `grpc-tags-bin` header.
#[derive(Debug, Default)]
pub struct StatsContextCodec {}

impl StatsContextCodec {
    /// Create a new stats context codec.
    pub fn new() -> Self {
        StatsContextCodec {}
    }

    /// Returns the header value for a tag set, or `None` when the set is
    /// empty or exceeds [`MAX_TAG_CONTEXT_LEN`]; the caller omits the
    /// header in both cases.
    pub fn encode(&self, context: &StatsContext) -> Option<Vec<u8>> {
        if context.is_empty() || context.len() > MAX_TAG_CONTEXT_LEN {
            return None;
        }
        Some(context.as_bytes().to_vec())
    }

    /// Accepts a bounded, non-empty blob; anything else is absent.
    pub fn decode(&self, bytes: &[u8]) -> Option<StatsContext> {
        if bytes.is_empty() || bytes.len() > MAX_TAG_CONTEXT_LEN {
            return None;
        }
        Some(StatsContext::new(bytes.to_vec()))
    }
}

/// Serializes [`ServerStats`] to and from the `grpc-server-stats-bin`
/// wire format.
///
/// Layout (version 0): `[version][0][elapsed ns: 8, little-endian]`.
#[derive(Debug, Default)]
pub struct ServerStatsCodec {}

impl ServerStatsCodec {
    /// Create a new server stats codec.
    pub fn new() -> Self {
        ServerStatsCodec {}
    }

    /// Serializes a server stats record into its binary header value.
    pub fn encode(&self, stats: &ServerStats) -> [u8; SERVER_STATS_LEN] {
        let nanos = u64::try_from(stats.elapsed.as_nanos()).unwrap_or(u64::MAX);
        let mut buf = [0u8; SERVER_STATS_LEN];
        buf[0] = FORMAT_VERSION;
        buf[1] = FIELD_ELAPSED_TIME;
        buf[2..10].copy_from_slice(&nanos.to_le_bytes());
        buf
    }

    /// Deserializes a server stats record, failing open on malformed input.
    pub fn decode(&self, bytes: &[u8]) -> Option<ServerStats> {
        let (&version, mut rest) = bytes.split_first()?;
        if version != FORMAT_VERSION {
            return None;
        }

        let mut elapsed = None;
        while let Some((&field_id, body)) = rest.split_first() {
            let len = match field_id {
                FIELD_ELAPSED_TIME => 8,
                _ => break,
            };
            if body.len() < len {
                return None;
            }
            let (value, tail) = body.split_at(len);
            let nanos = u64::from_le_bytes(value.try_into().ok()?);
            elapsed = Some(Duration::from_nanos(nanos));
            rest = tail;
        }

        elapsed.map(ServerStats::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampled_context() -> TraceContext {
        TraceContext::new(
            TraceId::from(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736),
            SpanId::from(0x00f0_67aa_0ba9_02b7),
            TraceFlags::SAMPLED,
        )
    }

    #[rustfmt::skip]
    fn encode_data() -> Vec<(TraceContext, [u8; TRACE_CONTEXT_LEN])> {
        vec![
            (sampled_context(), [
                0x00, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
                0x01, 0x00, 0xf0, 0x67, 0xaa, 0x0b, 0xa9, 0x02, 0xb7,
                0x02, 0x01,
            ]),
            (sampled_context().with_sampled(false), [
                0x00, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
                0x01, 0x00, 0xf0, 0x67, 0xaa, 0x0b, 0xa9, 0x02, 0xb7,
                0x02, 0x00,
            ]),
        ]
    }

    #[rustfmt::skip]
    fn decode_absent_data() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("empty", vec![]),
            ("version only", vec![0x00]),
            ("unsupported version", vec![
                0x01, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
                0x01, 0x00, 0xf0, 0x67, 0xaa, 0x0b, 0xa9, 0x02, 0xb7,
                0x02, 0x01,
            ]),
            ("truncated mid trace id", vec![
                0x00, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d,
            ]),
            ("truncated mid span id", vec![
                0x00, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
                0x01, 0x00, 0xf0,
            ]),
            ("zero trace id", vec![
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x01, 0x00, 0xf0, 0x67, 0xaa, 0x0b, 0xa9, 0x02, 0xb7,
                0x02, 0x01,
            ]),
            ("zero span id", vec![
                0x00, 0x00, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
                0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
                0x02, 0x01,
            ]),
            // First field id is unknown, so nothing is decoded before the
            // parser stops.
            ("unknown leading field id", vec![
                0x00, 0x07, 0x4b, 0xf9, 0x2f, 0x35, 0x77, 0xb3, 0x4d, 0xa6, 0xa3, 0xce, 0x92, 0x9d, 0x0e, 0x0e, 0x47, 0x36,
            ]),
        ]
    }

    #[test]
    fn trace_context_encodes_to_fixed_layout() {
        let codec = TraceContextCodec::new();
        for (context, expected) in encode_data() {
            assert_eq!(codec.encode(&context), Some(expected));
        }
    }

    #[test]
    fn invalid_trace_context_does_not_encode() {
        let codec = TraceContextCodec::new();
        let invalid = TraceContext::new(TraceId::INVALID, SpanId::INVALID, TraceFlags::SAMPLED);
        assert_eq!(codec.encode(&invalid), None);
    }

    #[test]
    fn trace_context_round_trip() {
        let codec = TraceContextCodec::new();
        for (context, _) in encode_data() {
            let bytes = codec.encode(&context).unwrap();
            assert_eq!(codec.decode(&bytes), Some(context));
        }
    }

    #[test]
    fn malformed_trace_context_decodes_as_absent() {
        let codec = TraceContextCodec::new();
        for (name, bytes) in decode_absent_data() {
            assert_eq!(codec.decode(&bytes), None, "case: {name}");
        }
    }

    #[test]
    fn missing_options_field_defaults_to_not_sampled() {
        let codec = TraceContextCodec::new();
        let mut bytes = codec.encode(&sampled_context()).unwrap().to_vec();
        bytes.truncate(27);
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.trace_id(), sampled_context().trace_id());
        assert!(!decoded.is_sampled());
    }

    #[test]
    fn unknown_trailing_field_id_keeps_decoded_prefix() {
        let codec = TraceContextCodec::new();
        let mut bytes = codec.encode(&sampled_context()).unwrap().to_vec();
        // A future field the length table does not know about.
        bytes.extend_from_slice(&[0x09, 0xde, 0xad]);
        assert_eq!(codec.decode(&bytes), Some(sampled_context()));
    }

    #[test]
    fn stats_context_bound_is_enforced() {
        let codec = StatsContextCodec::new();
        let small = StatsContext::new(vec![1; 16]);
        assert_eq!(codec.encode(&small), Some(vec![1; 16]));

        let exact = StatsContext::new(vec![2; MAX_TAG_CONTEXT_LEN]);
        assert!(codec.encode(&exact).is_some());

        let oversized = StatsContext::new(vec![3; MAX_TAG_CONTEXT_LEN + 1]);
        assert_eq!(codec.encode(&oversized), None);

        assert_eq!(codec.encode(&StatsContext::default()), None);
        assert_eq!(codec.decode(&[]), None);
        assert_eq!(codec.decode(&[7, 7]), Some(StatsContext::new(vec![7, 7])));
    }

    #[test]
    fn server_stats_round_trip() {
        let codec = ServerStatsCodec::new();
        let stats = ServerStats::new(Duration::from_nanos(1_234_567_890));
        let bytes = codec.encode(&stats);
        assert_eq!(bytes.len(), SERVER_STATS_LEN);
        assert_eq!(codec.decode(&bytes), Some(stats));
    }

    #[test]
    fn malformed_server_stats_decode_as_absent() {
        let codec = ServerStatsCodec::new();
        assert_eq!(codec.decode(&[]), None);
        // Unsupported version.
        assert_eq!(codec.decode(&[0x01, 0x00, 1, 0, 0, 0, 0, 0, 0, 0]), None);
        // Truncated elapsed-time field.
        assert_eq!(codec.decode(&[0x00, 0x00, 1, 0, 0]), None);
        // Unknown field id before any elapsed time was seen.
        assert_eq!(codec.decode(&[0x00, 0x05, 1, 0, 0, 0, 0, 0, 0, 0]), None);
    }
}
