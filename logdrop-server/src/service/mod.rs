//! Service layer
//!
//! Business logic for the two submission paths. Services only depend on the
//! `LogSink` trait so they can run against Loki or an in-memory sink.

pub mod import;

pub use import::{FileImportError, FileImportReport, ImportError, ImportSummary, UploadedFile};
