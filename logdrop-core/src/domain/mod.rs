//! Core domain types
//!
//! Entities built fresh for every import request and discarded once the
//! push payload has been produced.

pub mod batch;
