//! Logdrop Server
//!
//! Small web front-end that accepts pasted or uploaded log text, reads the
//! `service_name:` header line and forwards the lines to Loki.
//!
//! Architecture:
//! - Configuration: Flags / environment, resolved once at startup
//! - API: axum routes for text and file imports plus the static UI
//! - Services: Normalization and per-file reporting over a `LogSink`
//! - Scheduler: One-shot sample import after startup

pub mod api;
pub mod config;
pub mod scheduler;
pub mod service;

pub use config::Config;
