//! HTTP middleware for request processing.
//!
//! Admission control is not a layer: it runs inside each `/api/v1` handler
//! through the resolution gateway, keyed by the client identity.

pub mod tracing;
