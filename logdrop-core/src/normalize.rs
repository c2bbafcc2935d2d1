//! Input normalization
//!
//! Turns submitted text into a service name plus an ordered list of trimmed,
//! non-blank log lines. The service name is declared in-band on the first
//! line as `service_name: <name>`.
//!
//! Two entry points exist because the two submission paths treat a missing
//! declaration differently:
//! - [`normalize_text`] requires the declaration and fails hard without it.
//! - [`extract_from_reader`] treats an undeclared first line as log content and
//!   leaves the decision about an empty service name to the caller.

use std::io::BufRead;

use thiserror::Error;

use crate::domain::batch::LogBatch;

/// Literal prefix of the first-line service name declaration
pub const SERVICE_NAME_PREFIX: &str = "service_name:";

/// Errors produced while extracting a batch from submitted input
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The first line did not declare a non-empty service name
    #[error("Missing service_name. First line must be 'service_name: your-service-name'")]
    MissingServiceName,

    /// Nothing but blank lines remained after the declaration
    #[error("No valid log lines found")]
    NoValidLines,

    /// The underlying byte stream could not be read as lines
    #[error("{0}")]
    Read(#[from] std::io::Error),
}

/// Lines pulled from an uploaded file before validation.
///
/// `service_name` is empty when the first line carried no declaration (or an
/// empty one).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLines {
    pub service_name: String,
    pub lines: Vec<String>,
}

impl ExtractedLines {
    /// Validates the extracted content into a batch
    pub fn into_batch(self) -> Result<LogBatch, NormalizeError> {
        LogBatch::new(self.service_name, self.lines)
    }
}

/// Returns the declared service name if `line` is a `service_name:` directive.
///
/// The value is everything after the first colon, trimmed; it may be empty.
pub fn parse_service_directive(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if !trimmed.starts_with(SERVICE_NAME_PREFIX) {
        return None;
    }

    trimmed
        .split_once(':')
        .map(|(_, value)| value.trim().to_string())
}

/// Normalizes a pasted text blob.
///
/// The very first line (even if blank) must be the service name declaration.
pub fn normalize_text(text: &str) -> Result<LogBatch, NormalizeError> {
    let mut lines = text.split('\n');

    let service_name = lines
        .next()
        .and_then(parse_service_directive)
        .unwrap_or_default();

    if service_name.is_empty() {
        return Err(NormalizeError::MissingServiceName);
    }

    LogBatch::new(service_name, lines)
}

/// Reads an uploaded file line by line.
///
/// A first line that is not a declaration is kept as log content. Blank lines
/// are dropped everywhere.
pub fn extract_from_reader<R: BufRead>(reader: R) -> Result<ExtractedLines, NormalizeError> {
    let mut lines = reader.lines();
    let mut extracted = ExtractedLines::default();

    if let Some(first) = lines.next() {
        let first = first?;
        match parse_service_directive(&first) {
            Some(name) => extracted.service_name = name,
            None => push_trimmed(&mut extracted.lines, &first),
        }
    }

    for line in lines {
        push_trimmed(&mut extracted.lines, &line?);
    }

    Ok(extracted)
}

fn push_trimmed(lines: &mut Vec<String>, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}
