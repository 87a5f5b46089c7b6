//! Error types for the core primitives.

use thiserror::Error;

/// Errors from formatting or parsing ordinals, codes, and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("ordinal {0} does not fit in 10 digits")]
    OrdinalOverflow(u64),

    #[error("malformed code: {0}")]
    MalformedCode(String),

    #[error("malformed ordinal range: {0}")]
    MalformedRange(String),

    #[error("invalid batch id: {0}")]
    InvalidBatchId(String),

    #[error("stored secret is not valid text")]
    InvalidSecret,
}

/// Errors from extracting a caller identity out of a credential blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("no PEM block found in credential")]
    MissingPem,

    #[error("could not decode PEM structure: {0}")]
    InvalidPem(String),

    #[error("could not parse certificate: {0}")]
    InvalidCertificate(String),

    #[error("certificate subject has no common name")]
    MissingCommonName,
}
