//! Conversion of completed spans into the collector's wire format.
//!
//! Encoding is pure: no I/O, no shared state. Every timestamp written to
//! the wire is validated against the collector's representable calendar
//! range, and a span that fails validation is dropped from the batch while
//! the rest proceed; the caller receives the dropped count.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use prost_types::Timestamp;
use tracing::warn;

use crate::proto::devtools::cloudtrace::v2::{
    attribute_value,
    span::{self, time_event},
    AttributeValue as ProtoAttributeValue, BatchWriteSpansRequest, Span as ProtoSpan,
    TruncatableString,
};
use crate::proto::rpc;
use crate::span::{AttributeValue, LinkKind, MessageEventKind, SpanData, SpanLinks};
use crate::trace_context::SpanId;
use crate::Error;

/// Display names longer than this are truncated.
pub const MAX_DISPLAY_NAME_LEN: usize = 128;

/// String attribute values longer than this are truncated.
pub const MAX_ATTRIBUTE_VALUE_LEN: usize = 256;

/// Annotation descriptions longer than this are truncated.
pub const MAX_ANNOTATION_DESCRIPTION_LEN: usize = 256;

// Seconds for 0001-01-01T00:00:00Z and 9999-12-31T23:59:59Z, the range the
// collector accepts.
const MIN_TIMESTAMP_SECONDS: i64 = -62_135_596_800;
const MAX_TIMESTAMP_SECONDS: i64 = 253_402_300_799;

/// Convert a batch of completed spans into one `BatchWriteSpans` request.
///
/// Spans that fail timestamp validation are dropped and counted; input
/// order is preserved for the rest. The request targets
/// `projects/{project_id}`.
pub fn encode_batch(project_id: &str, batch: &[SpanData]) -> (BatchWriteSpansRequest, usize) {
    let mut spans = Vec::with_capacity(batch.len());
    let mut dropped = 0;
    for span in batch {
        match encode_span(project_id, span) {
            Ok(encoded) => spans.push(encoded),
            Err(error) => {
                dropped += 1;
                warn!(span = %span.name, %error, "dropping span from export batch");
            }
        }
    }
    let request = BatchWriteSpansRequest {
        name: format!("projects/{project_id}"),
        spans,
    };
    (request, dropped)
}

/// Convert a single completed span into its wire representation.
///
/// Fails when any of the span's timestamps (start, end, or a time event's)
/// is outside the representable range.
pub fn encode_span(project_id: &str, span: &SpanData) -> Result<ProtoSpan, Error> {
    let trace_id = span.context.trace_id();
    let span_id = span.context.span_id();
    Ok(ProtoSpan {
        name: format!("projects/{project_id}/traces/{trace_id}/spans/{span_id}"),
        span_id: span_id.to_string(),
        parent_span_id: if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            span.parent_span_id.to_string()
        },
        display_name: Some(truncatable_string(&span.name, MAX_DISPLAY_NAME_LEN)),
        start_time: Some(encode_timestamp(span.start_time)?),
        end_time: Some(encode_timestamp(span.end_time)?),
        attributes: Some(encode_attributes(
            &span.attributes,
            span.dropped_attributes_count,
        )),
        time_events: Some(encode_time_events(span)?),
        links: Some(encode_links(&span.links)),
        status: Some(rpc::Status {
            code: span.status.code,
            message: span.status.message.clone(),
            details: vec![],
        }),
        same_process_as_parent_span: Some(!span.has_remote_parent),
    })
}

/// Shorten `s` to at most `max_len` bytes, backing off to a UTF-8
/// character boundary, and record how many bytes were removed.
pub(crate) fn truncatable_string(s: &str, max_len: usize) -> TruncatableString {
    if s.len() <= max_len {
        return TruncatableString {
            value: s.to_owned(),
            truncated_byte_count: 0,
        };
    }
    let mut kept = max_len;
    while !s.is_char_boundary(kept) {
        kept -= 1;
    }
    TruncatableString {
        value: s[..kept].to_owned(),
        truncated_byte_count: (s.len() - kept) as i32,
    }
}

pub(crate) fn validate_timestamp(timestamp: &Timestamp) -> bool {
    (MIN_TIMESTAMP_SECONDS..=MAX_TIMESTAMP_SECONDS).contains(&timestamp.seconds)
        && (0..=999_999_999).contains(&timestamp.nanos)
}

fn encode_timestamp(time: SystemTime) -> Result<Timestamp, Error> {
    let timestamp = match time.duration_since(UNIX_EPOCH) {
        Ok(since) => Timestamp {
            seconds: since.as_secs() as i64,
            nanos: since.subsec_nanos() as i32,
        },
        Err(before) => {
            // Pre-epoch times still need nanos in [0, 1e9): borrow one
            // second when the sub-second part is non-zero.
            let before = before.duration();
            if before.subsec_nanos() == 0 {
                Timestamp {
                    seconds: -(before.as_secs() as i64),
                    nanos: 0,
                }
            } else {
                Timestamp {
                    seconds: -(before.as_secs() as i64) - 1,
                    nanos: 1_000_000_000 - before.subsec_nanos() as i32,
                }
            }
        }
    };
    if validate_timestamp(&timestamp) {
        Ok(timestamp)
    } else {
        Err(Error::InvalidTimestamp {
            seconds: timestamp.seconds,
            nanos: timestamp.nanos,
        })
    }
}

fn encode_attributes(
    attributes: &HashMap<String, AttributeValue>,
    dropped_count: u32,
) -> span::Attributes {
    let attribute_map = attributes
        .iter()
        .map(|(key, value)| {
            let value = match value {
                AttributeValue::String(s) => attribute_value::Value::StringValue(
                    truncatable_string(s, MAX_ATTRIBUTE_VALUE_LEN),
                ),
                AttributeValue::Bool(b) => attribute_value::Value::BoolValue(*b),
                AttributeValue::I64(i) => attribute_value::Value::IntValue(*i),
            };
            (key.clone(), ProtoAttributeValue { value: Some(value) })
        })
        .collect();
    span::Attributes {
        attribute_map,
        dropped_attributes_count: dropped_count as i32,
    }
}

fn encode_time_events(span: &SpanData) -> Result<span::TimeEvents, Error> {
    let mut time_event =
        Vec::with_capacity(span.annotations.events.len() + span.message_events.events.len());
    for annotation in &span.annotations.events {
        time_event.push(span::TimeEvent {
            time: Some(encode_timestamp(annotation.time)?),
            value: Some(time_event::Value::Annotation(time_event::Annotation {
                description: Some(truncatable_string(
                    &annotation.description,
                    MAX_ANNOTATION_DESCRIPTION_LEN,
                )),
                attributes: Some(encode_attributes(&annotation.attributes, 0)),
            })),
        });
    }
    for message in &span.message_events.events {
        let kind = match message.kind {
            MessageEventKind::Unspecified => time_event::message_event::Type::Unspecified,
            MessageEventKind::Sent => time_event::message_event::Type::Sent,
            MessageEventKind::Received => time_event::message_event::Type::Received,
        };
        time_event.push(span::TimeEvent {
            time: Some(encode_timestamp(message.time)?),
            value: Some(time_event::Value::MessageEvent(time_event::MessageEvent {
                r#type: kind as i32,
                id: message.id,
                uncompressed_size_bytes: message.uncompressed_size,
                compressed_size_bytes: message.compressed_size,
            })),
        });
    }
    Ok(span::TimeEvents {
        time_event,
        dropped_annotations_count: span.annotations.dropped_count as i32,
        dropped_message_events_count: span.message_events.dropped_count as i32,
    })
}

fn encode_links(links: &SpanLinks) -> span::Links {
    let link = links
        .links
        .iter()
        .map(|link| {
            let kind = match link.kind {
                LinkKind::Unspecified => span::link::Type::Unspecified,
                LinkKind::Child => span::link::Type::ChildLinkedSpan,
                LinkKind::Parent => span::link::Type::ParentLinkedSpan,
            };
            span::Link {
                trace_id: link.trace_id.to_string(),
                span_id: link.span_id.to_string(),
                r#type: kind as i32,
                attributes: Some(encode_attributes(&link.attributes, 0)),
            }
        })
        .collect();
    span::Links {
        link,
        dropped_links_count: links.dropped_count as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{
        Annotation, Link, MessageEvent, SpanAnnotations, SpanMessageEvents, Status,
    };
    use crate::trace_context::{TraceContext, TraceFlags, TraceId};
    use std::time::Duration;

    fn test_context() -> TraceContext {
        TraceContext::new(
            TraceId::from(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736),
            SpanId::from(0x00f0_67aa_0ba9_02b7),
            TraceFlags::SAMPLED,
        )
    }

    fn test_span(name: &'static str) -> SpanData {
        let mut span = SpanData::new(test_context(), name);
        span.start_time = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        span.end_time = span.start_time + Duration::from_millis(120);
        span
    }

    #[test]
    fn truncation_keeps_prefix_and_counts_removed_bytes() {
        let long: String = std::iter::repeat('x').take(300).collect();
        let truncated = truncatable_string(&long, MAX_DISPLAY_NAME_LEN);
        assert_eq!(truncated.value, long[..128]);
        assert_eq!(truncated.truncated_byte_count, 172);

        let short = truncatable_string("alpha", MAX_DISPLAY_NAME_LEN);
        assert_eq!(short.value, "alpha");
        assert_eq!(short.truncated_byte_count, 0);
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // Two-byte characters: the 5-byte limit falls inside the third one.
        let s = "ééé";
        assert_eq!(s.len(), 6);
        let truncated = truncatable_string(s, 5);
        assert_eq!(truncated.value, "éé");
        assert_eq!(truncated.truncated_byte_count, 2);
    }

    #[rustfmt::skip]
    fn timestamp_cases() -> Vec<(i64, i32, bool)> {
        vec![
            (MIN_TIMESTAMP_SECONDS, 0, true),
            (MAX_TIMESTAMP_SECONDS, 0, true),
            (MIN_TIMESTAMP_SECONDS - 1, 0, false),
            (MAX_TIMESTAMP_SECONDS + 1, 0, false),
            (0, -1, false),
            (0, 1_000_000_000, false),
            (0, 0, true),
            (0, 999_999_999, true),
        ]
    }

    #[test]
    fn timestamp_validation_boundaries() {
        for (seconds, nanos, valid) in timestamp_cases() {
            let timestamp = Timestamp { seconds, nanos };
            assert_eq!(
                validate_timestamp(&timestamp),
                valid,
                "seconds={seconds} nanos={nanos}"
            );
        }
    }

    #[test]
    fn encodes_span_identity_and_status() {
        let mut span = test_span("get-user");
        span.parent_span_id = SpanId::from(0x1122_3344_5566_7788);
        span.has_remote_parent = true;
        span.status = Status::new(5, "not found");

        let encoded = encode_span("demo-project", &span).unwrap();
        assert_eq!(
            encoded.name,
            "projects/demo-project/traces/4bf92f3577b34da6a3ce929d0e0e4736/spans/00f067aa0ba902b7"
        );
        assert_eq!(encoded.span_id, "00f067aa0ba902b7");
        assert_eq!(encoded.parent_span_id, "1122334455667788");
        assert_eq!(encoded.display_name.unwrap().value, "get-user");
        assert_eq!(encoded.same_process_as_parent_span, Some(false));
        let status = encoded.status.unwrap();
        assert_eq!(status.code, 5);
        assert_eq!(status.message, "not found");
        assert_eq!(
            encoded.start_time.unwrap(),
            Timestamp { seconds: 1_600_000_000, nanos: 0 }
        );
        assert_eq!(
            encoded.end_time.unwrap(),
            Timestamp { seconds: 1_600_000_000, nanos: 120_000_000 }
        );
    }

    #[test]
    fn root_span_has_empty_parent_id() {
        let encoded = encode_span("demo-project", &test_span("root")).unwrap();
        assert_eq!(encoded.parent_span_id, "");
        assert_eq!(encoded.same_process_as_parent_span, Some(true));
    }

    #[test]
    fn encodes_typed_attributes_with_truncation() {
        let mut span = test_span("attrs");
        let long: String = std::iter::repeat('v').take(300).collect();
        span.attributes.insert("s".into(), long.as_str().into());
        span.attributes.insert("b".into(), true.into());
        span.attributes.insert("i".into(), 42i64.into());
        span.dropped_attributes_count = 3;

        let encoded = encode_span("demo-project", &span).unwrap();
        let attributes = encoded.attributes.unwrap();
        assert_eq!(attributes.dropped_attributes_count, 3);
        assert_eq!(attributes.attribute_map.len(), 3);
        match attributes.attribute_map["s"].value.as_ref().unwrap() {
            attribute_value::Value::StringValue(s) => {
                assert_eq!(s.value.len(), MAX_ATTRIBUTE_VALUE_LEN);
                assert_eq!(s.truncated_byte_count, 44);
            }
            other => panic!("unexpected value: {other:?}"),
        }
        assert_eq!(
            attributes.attribute_map["b"].value,
            Some(attribute_value::Value::BoolValue(true))
        );
        assert_eq!(
            attributes.attribute_map["i"].value,
            Some(attribute_value::Value::IntValue(42))
        );
    }

    #[test]
    fn merges_time_events_in_order_with_dropped_counts() {
        let mut span = test_span("events");
        let base = span.start_time;
        span.annotations = SpanAnnotations {
            events: vec![
                Annotation::new(base, "first"),
                Annotation::new(base + Duration::from_millis(10), "second"),
            ],
            dropped_count: 4,
        };
        span.message_events = SpanMessageEvents {
            events: vec![MessageEvent {
                time: base + Duration::from_millis(5),
                kind: MessageEventKind::Sent,
                id: 1,
                uncompressed_size: 2048,
                compressed_size: 512,
            }],
            dropped_count: 2,
        };

        let encoded = encode_span("demo-project", &span).unwrap();
        let time_events = encoded.time_events.unwrap();
        assert_eq!(time_events.dropped_annotations_count, 4);
        assert_eq!(time_events.dropped_message_events_count, 2);
        assert_eq!(time_events.time_event.len(), 3);

        match time_events.time_event[0].value.as_ref().unwrap() {
            time_event::Value::Annotation(annotation) => {
                assert_eq!(annotation.description.as_ref().unwrap().value, "first");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match time_events.time_event[1].value.as_ref().unwrap() {
            time_event::Value::Annotation(annotation) => {
                assert_eq!(annotation.description.as_ref().unwrap().value, "second");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match time_events.time_event[2].value.as_ref().unwrap() {
            time_event::Value::MessageEvent(message) => {
                assert_eq!(
                    message.r#type,
                    time_event::message_event::Type::Sent as i32
                );
                assert_eq!(message.id, 1);
                assert_eq!(message.uncompressed_size_bytes, 2048);
                assert_eq!(message.compressed_size_bytes, 512);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn encodes_links_in_order() {
        let mut span = test_span("links");
        span.links = SpanLinks {
            links: vec![Link {
                trace_id: TraceId::from(7),
                span_id: SpanId::from(9),
                kind: LinkKind::Parent,
                attributes: HashMap::new(),
            }],
            dropped_count: 1,
        };

        let encoded = encode_span("demo-project", &span).unwrap();
        let links = encoded.links.unwrap();
        assert_eq!(links.dropped_links_count, 1);
        assert_eq!(links.link.len(), 1);
        assert_eq!(links.link[0].trace_id, "00000000000000000000000000000007");
        assert_eq!(links.link[0].span_id, "0000000000000009");
        assert_eq!(links.link[0].r#type, span::link::Type::ParentLinkedSpan as i32);
    }

    #[test]
    fn invalid_timestamp_fails_the_span() {
        let mut span = test_span("bad-clock");
        span.end_time = UNIX_EPOCH + Duration::from_secs((MAX_TIMESTAMP_SECONDS + 1) as u64);
        let err = encode_span("demo-project", &span).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
    }

    #[test]
    fn invalid_event_timestamp_fails_the_span() {
        let mut span = test_span("bad-event");
        span.annotations = SpanAnnotations {
            events: vec![Annotation::new(
                UNIX_EPOCH + Duration::from_secs((MAX_TIMESTAMP_SECONDS + 1) as u64),
                "late",
            )],
            dropped_count: 0,
        };
        let err = encode_span("demo-project", &span).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
    }

    #[test]
    fn batch_drops_only_the_invalid_span() {
        let mut bad = test_span("two");
        bad.start_time = UNIX_EPOCH + Duration::from_secs((MAX_TIMESTAMP_SECONDS + 1) as u64);
        let batch = vec![test_span("one"), bad, test_span("three")];

        let (request, dropped) = encode_batch("demo-project", &batch);
        assert_eq!(request.name, "projects/demo-project");
        assert_eq!(dropped, 1);
        assert_eq!(request.spans.len(), 2);
        assert_eq!(request.spans[0].display_name.as_ref().unwrap().value, "one");
        assert_eq!(
            request.spans[1].display_name.as_ref().unwrap().value,
            "three"
        );
    }
}
