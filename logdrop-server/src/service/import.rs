//! Import Service
//!
//! Text imports are all-or-nothing. File imports run each file independently
//! and collect a per-file report, so one bad file never stops its siblings.

use std::fmt;

use bytes::Bytes;
use logdrop_client::{ClientError, LogSink};
use logdrop_core::LogBatch;
use logdrop_core::normalize::{self, NormalizeError};
use thiserror::Error;

/// Error from the text import path
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Invalid(#[from] NormalizeError),

    #[error("Failed to send logs to Loki: {0}")]
    Push(#[from] ClientError),
}

/// Outcome of a successful text import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub service_name: String,
    pub line_count: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully imported {} log lines as service '{}'",
            self.line_count, self.service_name
        )
    }
}

/// Normalize pasted text and push it as one batch
pub async fn import_text(sink: &dyn LogSink, text: &str) -> Result<ImportSummary, ImportError> {
    let batch = normalize::normalize_text(text)?;

    sink.push_batch(&batch).await?;

    tracing::info!(
        "Imported {} pasted log lines for service '{}'",
        batch.len(),
        batch.service_name()
    );

    Ok(ImportSummary {
        service_name: batch.service_name().to_string(),
        line_count: batch.len(),
    })
}

// =============================================================================
// File Imports
// =============================================================================

/// One uploaded file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// File body, or the reason it could not be read from the request
    pub content: Result<Bytes, String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: Ok(content.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Err(reason.into()),
        }
    }
}

/// Why a single uploaded file was not imported
#[derive(Debug, Error)]
pub enum FileImportError {
    #[error("Failed to open {file}: {reason}")]
    Open { file: String, reason: String },

    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        source: NormalizeError,
    },

    #[error(
        "ERROR: {file} is missing service_name. Add 'service_name: your-service-name' as the first line"
    )]
    MissingServiceName { file: String },

    #[error("ERROR: {file} contains no valid log lines")]
    NoValidLines { file: String },

    #[error("Failed to import {file}: {source}")]
    Push { file: String, source: ClientError },
}

/// A file that made it to Loki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImportSuccess {
    pub file: String,
    pub line_count: usize,
    pub service_name: String,
}

impl fmt::Display for FileImportSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "✓ {}: {} lines imported (service: {})",
            self.file, self.line_count, self.service_name
        )
    }
}

/// Aggregate result of a multi-file upload
#[derive(Debug, Default)]
pub struct FileImportReport {
    file_count: usize,
    total_lines: usize,
    successes: Vec<FileImportSuccess>,
    errors: Vec<FileImportError>,
}

impl FileImportReport {
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn successes(&self) -> &[FileImportSuccess] {
        &self.successes
    }

    pub fn errors(&self) -> &[FileImportError] {
        &self.errors
    }

    /// True when there were errors and nothing was imported
    pub fn all_failed(&self) -> bool {
        !self.errors.is_empty() && self.successes.is_empty()
    }

    /// Error lines joined by newlines
    pub fn error_summary(&self) -> String {
        join_lines(&self.errors)
    }

    fn record_success(&mut self, success: FileImportSuccess) {
        self.total_lines += success.line_count;
        self.successes.push(success);
    }
}

impl fmt::Display for FileImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} file(s), imported {} total lines\n\n",
            self.file_count, self.total_lines
        )?;

        if !self.successes.is_empty() {
            write!(f, "SUCCESS:\n{}", join_lines(&self.successes))?;
        }

        if !self.errors.is_empty() {
            write!(f, "\n\nERRORS:\n{}", join_lines(&self.errors))?;
        }

        Ok(())
    }
}

fn join_lines<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Import every file in order, one push per file
pub async fn import_files(sink: &dyn LogSink, files: Vec<UploadedFile>) -> FileImportReport {
    let mut report = FileImportReport {
        file_count: files.len(),
        ..Default::default()
    };

    for file in files {
        match import_file(sink, file).await {
            Ok(success) => {
                tracing::info!(
                    "Imported {} lines from {} (service: {})",
                    success.line_count,
                    success.file,
                    success.service_name
                );
                report.record_success(success);
            }
            Err(err) => {
                tracing::warn!("{}", err);
                report.errors.push(err);
            }
        }
    }

    report
}

async fn import_file(
    sink: &dyn LogSink,
    file: UploadedFile,
) -> Result<FileImportSuccess, FileImportError> {
    let UploadedFile { name, content } = file;

    let content = match content {
        Ok(content) => content,
        Err(reason) => return Err(FileImportError::Open { file: name, reason }),
    };

    let extracted = match normalize::extract_from_reader(&content[..]) {
        Ok(extracted) => extracted,
        Err(source) => return Err(FileImportError::Read { file: name, source }),
    };

    let batch: LogBatch = match extracted.into_batch() {
        Ok(batch) => batch,
        Err(NormalizeError::MissingServiceName) => {
            return Err(FileImportError::MissingServiceName { file: name });
        }
        Err(NormalizeError::NoValidLines) => {
            return Err(FileImportError::NoValidLines { file: name });
        }
        Err(source) => return Err(FileImportError::Read { file: name, source }),
    };

    if let Err(source) = sink.push_batch(&batch).await {
        return Err(FileImportError::Push { file: name, source });
    }

    Ok(FileImportSuccess {
        file: name,
        line_count: batch.len(),
        service_name: batch.service_name().to_string(),
    })
}
