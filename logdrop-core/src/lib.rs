//! Logdrop Core
//!
//! Core types and pure logic for the logdrop importer.
//!
//! This crate contains:
//! - Domain types: the validated `LogBatch` handed from input parsing to ingestion
//! - DTOs: the Loki push payload (`PushRequest` / `PushStream`) and its formatter
//! - Normalization: extraction of the `service_name:` directive and log lines

pub mod domain;
pub mod dto;
pub mod normalize;

pub use domain::batch::LogBatch;
pub use normalize::NormalizeError;
