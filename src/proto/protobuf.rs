/// A generic empty message, used as the response of calls that carry no
/// payload.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}
