//! Reader configuration: delimiters, quoting and decoding

use crate::error::{Result, TableError};

/// Record delimiter selection
///
/// Resolves one of the common newline conventions (or an arbitrary string)
/// to the delimiter that terminates a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Newline {
    /// Carriage return (`\r`)
    Cr,
    /// Line feed (`\n`)
    Lf,
    /// Carriage return + line feed (`\r\n`)
    CrLf,
    /// Any non-empty custom delimiter string
    Custom(String),
}

impl Newline {
    /// Resolve to the delimiter string
    pub fn as_str(&self) -> &str {
        match self {
            Newline::Cr => "\r",
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
            Newline::Custom(s) => s,
        }
    }
}

/// Text decoding mode for the underlying byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8: invalid sequences fail with a decode error
    #[default]
    Utf8,
    /// Lossy UTF-8: invalid sequences become U+FFFD
    Utf8Lossy,
}

/// Settings for a [`TableReader`](crate::reader::TableReader)
///
/// Immutable once a reader is constructed from them. Built with chained
/// methods:
///
/// ```
/// use tabstream::settings::{Newline, TableSettings};
///
/// let settings = TableSettings::default()
///     .field_separator(";")
///     .record_delimiter(Newline::Lf)
///     .quote('\'');
/// ```
#[derive(Debug, Clone)]
pub struct TableSettings {
    field_separator: String,
    record_delimiter: Newline,
    quote: char,
    encoding: Encoding,
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            field_separator: ",".to_string(),
            record_delimiter: Newline::CrLf,
            quote: '"',
            encoding: Encoding::Utf8,
        }
    }
}

impl TableSettings {
    /// Create settings with the defaults: `,` separator, CRLF records, `"` quote
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field separator string (may be multi-character)
    pub fn field_separator(mut self, separator: impl Into<String>) -> Self {
        self.field_separator = separator.into();
        self
    }

    /// Set the record delimiter
    pub fn record_delimiter(mut self, delimiter: Newline) -> Self {
        self.record_delimiter = delimiter;
        self
    }

    /// Set the quotation character
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the decoding mode
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Get the field separator
    pub fn separator_str(&self) -> &str {
        &self.field_separator
    }

    /// Get the resolved record delimiter string
    pub fn delimiter_str(&self) -> &str {
        self.record_delimiter.as_str()
    }

    /// Get the quotation character
    pub fn quote_char(&self) -> char {
        self.quote
    }

    /// Get the decoding mode
    pub fn decoding(&self) -> Encoding {
        self.encoding
    }

    /// Validate the settings
    ///
    /// Both delimiter strings must be non-empty. Called when a reader is
    /// constructed; violations are configuration errors.
    pub fn validate(&self) -> Result<()> {
        if self.field_separator.is_empty() {
            return Err(TableError::Config(
                "field separator must not be empty".to_string(),
            ));
        }
        if self.record_delimiter.as_str().is_empty() {
            return Err(TableError::Config(
                "record delimiter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TableSettings::default();
        assert_eq!(settings.separator_str(), ",");
        assert_eq!(settings.delimiter_str(), "\r\n");
        assert_eq!(settings.quote_char(), '"');
        assert_eq!(settings.decoding(), Encoding::Utf8);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_newline_resolution() {
        assert_eq!(Newline::Cr.as_str(), "\r");
        assert_eq!(Newline::Lf.as_str(), "\n");
        assert_eq!(Newline::CrLf.as_str(), "\r\n");
        assert_eq!(Newline::Custom("||".to_string()).as_str(), "||");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let settings = TableSettings::default().field_separator("");
        assert!(matches!(settings.validate(), Err(TableError::Config(_))));
    }

    #[test]
    fn test_empty_custom_delimiter_rejected() {
        let settings =
            TableSettings::default().record_delimiter(Newline::Custom(String::new()));
        assert!(matches!(settings.validate(), Err(TableError::Config(_))));
    }
}
