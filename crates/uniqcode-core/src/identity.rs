//! Caller identity extraction.
//!
//! The host hands over the submitter's credential as an opaque blob with an
//! X.509 certificate embedded somewhere inside it in PEM form. We locate
//! the PEM block, parse the certificate, and read the subject common name.
//! No chain validation happens here; the host has already authenticated
//! the submitter.

use x509_parser::prelude::parse_x509_certificate;

use crate::error::IdentityError;

/// Start of any PEM block.
pub const PEM_MARKER: &[u8] = b"-----BEGIN";

/// Separator between an org-assigned prefix and the user name.
pub const USER_ID_DELIMITER: char = '_';

/// Extract the subject common name of the certificate embedded in `credential`.
///
/// Bytes before the first PEM marker (for example a serialized MSP id) are
/// skipped, and only the first certificate block is read.
pub fn common_name_from_credential(credential: &[u8]) -> Result<String, IdentityError> {
    let start = credential
        .windows(PEM_MARKER.len())
        .position(|window| window == PEM_MARKER)
        .ok_or(IdentityError::MissingPem)?;

    let mut pem = &credential[start..];
    let der = rustls_pemfile::certs(&mut pem)
        .next()
        .ok_or_else(|| IdentityError::InvalidPem("no certificate block".into()))?
        .map_err(|e| IdentityError::InvalidPem(e.to_string()))?;

    let (_, cert) = parse_x509_certificate(der.as_ref())
        .map_err(|e| IdentityError::InvalidCertificate(e.to_string()))?;

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .ok_or(IdentityError::MissingCommonName)?
        .as_str()
        .map_err(|e| IdentityError::InvalidCertificate(e.to_string()))?;

    Ok(common_name.to_string())
}

/// Reduce a raw identity to its logical user id.
///
/// Names follow the `"<org-assigned-id>_<user name>"` convention. Without a
/// delimiter the name is returned unchanged; otherwise the second segment is.
pub fn resolve_user_id(raw_identity: &str) -> &str {
    raw_identity
        .split(USER_ID_DELIMITER)
        .nth(1)
        .unwrap_or(raw_identity)
}
