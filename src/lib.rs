#![deny(missing_docs)]

//! Core library for the Student Registry HTTP service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Record activity counters.
pub mod metrics;
/// Record access service over the student collection.
pub mod records;
/// Document store integration.
pub mod store;
