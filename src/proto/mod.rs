//! Wire-format messages for the Cloud Trace v2 collector, maintained by
//! hand in `prost`/`tonic` generated style so the crate builds without a
//! protoc toolchain. Only the subset of `google.devtools.cloudtrace.v2`
//! (plus `google.rpc.Status` and `google.protobuf.Empty`) exercised by the
//! exporter is kept.

pub mod devtools {
    pub mod cloudtrace {
        pub mod v2;
    }
}

pub mod protobuf;
pub mod rpc;
