//! Completed-span records, the read-only input to the export encoder.
//!
//! These are produced by the span-recording layer once a span ends. The
//! encoder consumes them without mutating; dropped-element counts reflect
//! limits applied by the recorder, not by this crate.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Deref;
use std::time::SystemTime;

use crate::trace_context::{SpanId, TraceContext, TraceId};

/// A typed attribute value attached to a span, annotation, or link.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// A string value, truncated on export when over the per-value bound.
    String(String),
    /// A boolean value, exported unmodified.
    Bool(bool),
    /// A 64-bit integer value, exported unmodified.
    I64(i64),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::I64(value)
    }
}

/// Final status of the operation a span describes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// Canonical RPC status code; zero is OK.
    pub code: i32,
    /// Developer-facing error message, empty when OK.
    pub message: String,
}

impl Status {
    /// Status for a successful operation.
    pub fn ok() -> Self {
        Status::default()
    }

    /// Status for a failed operation.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Status {
            code,
            message: message.into(),
        }
    }
}

/// A timestamped text annotation recorded on a span.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// When the annotation was recorded.
    pub time: SystemTime,
    /// Description, truncated on export when over the per-value bound.
    pub description: String,
    /// Attributes attached to this annotation.
    pub attributes: HashMap<String, AttributeValue>,
}

impl Annotation {
    /// Record an annotation without attributes.
    pub fn new(time: SystemTime, description: impl Into<String>) -> Self {
        Annotation {
            time,
            description: description.into(),
            attributes: HashMap::new(),
        }
    }
}

/// Direction of a message event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageEventKind {
    /// Direction was not recorded.
    #[default]
    Unspecified,
    /// The message was sent by this process.
    Sent,
    /// The message was received by this process.
    Received,
}

/// A message send or receive recorded on a span.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEvent {
    /// When the message crossed the boundary.
    pub time: SystemTime,
    /// Send or receive.
    pub kind: MessageEventKind,
    /// Identifier unique within the span, matching sends to receives.
    pub id: i64,
    /// Size before any transport compression.
    pub uncompressed_size: i64,
    /// Size on the wire; zero when compression was not used.
    pub compressed_size: i64,
}

/// Kind of relationship a link describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkKind {
    /// Relationship was not recorded.
    #[default]
    Unspecified,
    /// The linked span is a child of this span.
    Child,
    /// The linked span is a parent of this span.
    Parent,
}

/// A reference from one span to another, possibly in a different trace.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    /// Trace id of the linked span.
    pub trace_id: TraceId,
    /// Span id of the linked span.
    pub span_id: SpanId,
    /// Relationship of the linked span to this one.
    pub kind: LinkKind,
    /// Attributes attached to this link.
    pub attributes: HashMap<String, AttributeValue>,
}

/// Ordered annotations along with the count dropped by the recorder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanAnnotations {
    /// The recorded annotations, in recording order.
    pub events: Vec<Annotation>,
    /// The number of annotations dropped by the recorder's limits.
    pub dropped_count: u32,
}

impl Deref for SpanAnnotations {
    type Target = [Annotation];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}

/// Ordered message events along with the count dropped by the recorder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanMessageEvents {
    /// The recorded message events, in recording order.
    pub events: Vec<MessageEvent>,
    /// The number of message events dropped by the recorder's limits.
    pub dropped_count: u32,
}

impl Deref for SpanMessageEvents {
    type Target = [MessageEvent];

    fn deref(&self) -> &Self::Target {
        &self.events
    }
}

/// Span links along with the count dropped by the recorder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanLinks {
    /// The recorded links, in recording order.
    pub links: Vec<Link>,
    /// The number of links dropped by the recorder's limits.
    pub dropped_count: u32,
}

impl Deref for SpanLinks {
    type Target = [Link];

    fn deref(&self) -> &Self::Target {
        &self.links
    }
}

/// Everything collected about one completed span.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanData {
    /// Trace id, span id, and flags of this span.
    pub context: TraceContext,
    /// Id of the parent span; [`SpanId::INVALID`] for a root span.
    pub parent_span_id: SpanId,
    /// Display name of the operation.
    pub name: Cow<'static, str>,
    /// When the operation started.
    pub start_time: SystemTime,
    /// When the operation ended.
    pub end_time: SystemTime,
    /// Span attributes.
    pub attributes: HashMap<String, AttributeValue>,
    /// The number of attributes dropped by the recorder's limits.
    pub dropped_attributes_count: u32,
    /// Timestamped annotations.
    pub annotations: SpanAnnotations,
    /// Message send/receive events.
    pub message_events: SpanMessageEvents,
    /// Links to related spans.
    pub links: SpanLinks,
    /// Final status of the operation.
    pub status: Status,
    /// `true` when the parent span executed in a different process.
    pub has_remote_parent: bool,
}

impl SpanData {
    /// A completed span with the given identity and name; everything else
    /// starts empty, with both timestamps set to `now`.
    pub fn new(context: TraceContext, name: impl Into<Cow<'static, str>>) -> Self {
        let now = SystemTime::now();
        SpanData {
            context,
            parent_span_id: SpanId::INVALID,
            name: name.into(),
            start_time: now,
            end_time: now,
            attributes: HashMap::new(),
            dropped_attributes_count: 0,
            annotations: SpanAnnotations::default(),
            message_events: SpanMessageEvents::default(),
            links: SpanLinks::default(),
            status: Status::ok(),
            has_remote_parent: false,
        }
    }
}
