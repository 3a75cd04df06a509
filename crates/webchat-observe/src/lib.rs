//! Observability for the WebChat AI core: tracing subscriber setup and
//! optional OpenTelemetry export.

pub mod tracing_setup;
