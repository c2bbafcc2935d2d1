//! Scheduled jobs
//!
//! Background work started alongside the HTTP server.

pub mod sample_import;

pub use sample_import::SampleImportJob;
