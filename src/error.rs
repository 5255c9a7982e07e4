/// Error types for quotation document generation.
use thiserror::Error;

/// Result type for quotegen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quotegen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template file does not exist
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// Required package part is missing
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// File is not a valid WordprocessingML package
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Placeholder key outside the recognized field set
    #[error("Unknown merge field: {0}")]
    UnknownField(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}
