//! Observability setup for SwapMatch: structured logging via `tracing` with
//! optional OpenTelemetry span export.

pub mod tracing_setup;
