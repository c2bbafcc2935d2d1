//! Data Transfer Objects
//!
//! Wire-format types exchanged with the log aggregation backend.

pub mod push;
