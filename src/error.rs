// src/error.rs

use thiserror::Error;

/// Coarse classification used by the CLI to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input table has a shape the loader does not understand.
    Format,
    /// Anything else: bad numbers, I/O, acquisition or plotting failures.
    Unexpected,
}

/// Errors raised while loading, analysing or rendering acceleration data.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Unsupported format: expected 4 or 5 columns, got {columns}")]
    UnsupportedFormat { columns: usize },

    #[error("Column {index} requested for {axis} axis, but the table only has {columns} columns")]
    ColumnOutOfRange {
        axis: &'static str,
        index: usize,
        columns: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid number '{value}' at row {row}, column {column}")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("No acceleration samples found in input")]
    EmptyInput,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Acquisition device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Acquisition error: {0}")]
    Acquisition(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Wraps the error with a human readable context prefix.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Format errors are surfaced as validation messages, everything else as unexpected.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::UnsupportedFormat { .. } | AnalysisError::ColumnOutOfRange { .. } => {
                ErrorKind::Format
            }
            AnalysisError::WithContext { source, .. } => source.kind(),
            _ => ErrorKind::Unexpected,
        }
    }

    /// Wraps any plotters drawing error.
    pub fn plot<E: std::fmt::Display>(err: E) -> Self {
        AnalysisError::Plot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Adds context to fallible results without matching on them.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, csv::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::from(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::from(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_column_count() {
        let err = AnalysisError::UnsupportedFormat { columns: 3 };
        assert_eq!(
            err.to_string(),
            "Unsupported format: expected 4 or 5 columns, got 3"
        );
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_context_keeps_kind() {
        let err = AnalysisError::UnsupportedFormat { columns: 7 }.with_context("Loading data.csv");
        assert!(err.to_string().starts_with("Loading data.csv: "));
        assert!(err.to_string().contains("got 7"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        let err = AnalysisError::InvalidNumber {
            row: 4,
            column: 2,
            value: "abc".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("'abc'"));
        assert_eq!(AnalysisError::EmptyInput.kind(), ErrorKind::Unexpected);
    }
}
