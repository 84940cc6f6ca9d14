//! Error types for table reading and record binding

use thiserror::Error;

/// Errors produced while reading delimited text or binding records
#[derive(Debug, Error)]
pub enum TableError {
    /// The reader has been closed; no further operations are possible
    #[error("reader has been closed")]
    Closed,

    /// The input stream violates the delimited-text format
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Invalid construction-time settings or layout configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A column could not be resolved against the header or record
    #[error("column lookup failed: {0}")]
    Lookup(String),

    /// A field value could not be converted to its target kind
    #[error("conversion failed: {0}")]
    Convert(String),

    /// I/O failure from the underlying source
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    /// The source bytes are not valid UTF-8 (strict decoding only)
    #[error("invalid UTF-8 in input: {0}")]
    Decode(String),
}

/// Result type alias for tabstream operations
pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TableError::Malformed("unterminated quoted field".to_string());
        assert_eq!(
            err.to_string(),
            "malformed input: unterminated quoted field"
        );

        let err = TableError::Closed;
        assert_eq!(err.to_string(), "reader has been closed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: TableError = io.into();
        assert!(matches!(err, TableError::Read(_)));
    }
}
