//! Error types for orcid-work

use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;

/// Result type alias for work record operations
pub type Result<T> = std::result::Result<T, WorkError>;

/// Main error type for work record operations
#[derive(Error, Debug)]
pub enum WorkError {
    /// Metadata could not be fetched
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// The schema artifact is missing or unusable
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The write API failed or refused the request
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No registry work type for this source type (strict mapping only)
    #[error("Unknown work type: type={work_type:?} subtype={subtype:?}")]
    UnknownWorkType {
        work_type: Option<String>,
        subtype: Option<String>,
    },

    /// Submission attempted without the required metadata elements
    #[error("Metadata for {doi} lacks required elements")]
    IncompleteMetadata { doi: String },

    #[error("Invalid DOI: {0}")]
    InvalidDoi(String),

    #[error("Invalid ORCID iD: {0}")]
    InvalidOrcid(String),

    /// Writing the XML document failed
    #[error("XML serialization failed: {0}")]
    Xml(String),
}

/// Metadata lookup failures
#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The registry has no record for this DOI
    #[error("DOI not found: {doi}")]
    NotFound { doi: String },

    /// Any other non-success status
    #[error("Lookup of {doi} returned HTTP {status}")]
    Status { doi: String, status: u16 },

    /// The response body is not usable metadata
    #[error("Malformed metadata for {doi}: {message}")]
    Malformed { doi: String, message: String },
}

/// Work schema failures
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema not found: {path}")]
    Missing { path: PathBuf },

    /// libxml2 could not compile the schema or one of its imports
    #[error("Cannot compile schema {path}: {}", messages.join("; "))]
    Invalid { path: PathBuf, messages: Vec<String> },
}

/// Write API failures
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Non-success response from the registry
    #[error("Request rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A created work came back without a usable Location header
    #[error("Response did not include a put-code")]
    MissingPutCode,
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid URL for {key}: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
