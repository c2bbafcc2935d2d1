//! Log batch domain type

use crate::normalize::NormalizeError;

/// A validated group of log lines that share one service name.
///
/// A batch always has a non-empty service name and at least one line, and
/// every line is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBatch {
    service_name: String,
    lines: Vec<String>,
}

impl LogBatch {
    /// Builds a batch, trimming the service name and every line and dropping
    /// lines that are blank after trimming.
    pub fn new<I, S>(service_name: impl Into<String>, lines: I) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let service_name = service_name.into().trim().to_string();
        if service_name.is_empty() {
            return Err(NormalizeError::MissingServiceName);
        }

        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(NormalizeError::NoValidLines);
        }

        Ok(Self {
            service_name,
            lines,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of log lines in the batch
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false for a constructed batch
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
