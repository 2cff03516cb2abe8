//! Common errors
//!
//! Failures are reported as small leaf types that are aggregated into
//! [`JwtSigningError`] (producing a token) and [`JwtVerifyError`] (accepting
//! a token). Both aggregates can be collapsed into a coarse [`ErrorKind`].

#![allow(missing_copy_implementations)]

use std::{error::Error as StdError, fmt};

use thiserror::Error;

/// The coarse classification of a token failure
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The header or claims could not be serialized
    Encoding,
    /// The token is structurally invalid: wrong number of sections,
    /// invalid base64url, or invalid JSON
    MalformedToken,
    /// The token names an algorithm other than the one supported
    UnsupportedAlgorithm,
    /// The signature does not match the token contents under the given key
    SignatureInvalid,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Encoding => "encoding",
            Self::MalformedToken => "malformed token",
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::SignatureInvalid => "signature invalid",
        };

        f.write_str(s)
    }
}

/// The JWT cannot be split into non-empty header, payload, and signature sections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("malformed JWT: {reason}")]
pub struct MalformedJwt {
    reason: &'static str,
}

pub(crate) const fn malformed_jwt(reason: &'static str) -> MalformedJwt {
    MalformedJwt { reason }
}

/// The JWT header section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT header")]
pub struct MalformedJwtHeader {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_header(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtHeader {
    MalformedJwtHeader {
        source: source.into(),
    }
}

/// The JWT payload section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT payload")]
pub struct MalformedJwtPayload {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_payload(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtPayload {
    MalformedJwtPayload {
        source: source.into(),
    }
}

/// The JWT signature section is malformed
#[derive(Debug, Error)]
#[error("malformed JWT signature")]
pub struct MalformedJwtSignature {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn malformed_jwt_signature(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> MalformedJwtSignature {
    MalformedJwtSignature {
        source: source.into(),
    }
}

/// The algorithm named is not supported
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("'{alg}' is not a supported signing algorithm")]
pub struct UnsupportedAlgorithm {
    alg: String,
}

impl UnsupportedAlgorithm {
    /// The rejected algorithm name, exactly as it was presented
    #[must_use]
    pub fn alg(&self) -> &str {
        &self.alg
    }
}

#[inline]
pub(crate) fn unsupported_algorithm(alg: impl Into<String>) -> UnsupportedAlgorithm {
    UnsupportedAlgorithm { alg: alg.into() }
}

/// The signature did not match
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("signature mismatch")]
pub struct SignatureMismatch {
    _p: (),
}

pub(crate) const fn signature_mismatch() -> SignatureMismatch {
    SignatureMismatch { _p: () }
}

/// Unexpected error (possibly a bug)
#[derive(Debug, Error)]
#[error("unexpected error")]
pub struct Unexpected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn unexpected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> Unexpected {
    Unexpected {
        source: source.into(),
    }
}

/// An error occurring while producing a JWT
#[derive(Debug, Error)]
pub enum JwtSigningError {
    /// The JWT header could not be serialized
    #[error(transparent)]
    MalformedJwtHeader(#[from] MalformedJwtHeader),

    /// The JWT claims could not be serialized
    #[error(transparent)]
    MalformedJwtPayload(#[from] MalformedJwtPayload),
}

impl JwtSigningError {
    /// The coarse classification of this error
    ///
    /// Always [`ErrorKind::Encoding`]: signing itself cannot fail.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Encoding
    }
}

/// An error occurring while verifying a JWT
#[derive(Debug, Error)]
pub enum JwtVerifyError {
    /// The JWT is malformed, without a discernible header, payload, and signature
    #[error(transparent)]
    MalformedToken(#[from] MalformedJwt),

    /// The JWT header is malformed
    #[error(transparent)]
    MalformedTokenHeader(#[from] MalformedJwtHeader),

    /// The JWT payload is malformed
    #[error(transparent)]
    MalformedTokenPayload(#[from] MalformedJwtPayload),

    /// The JWT signature is malformed
    #[error(transparent)]
    MalformedTokenSignature(#[from] MalformedJwtSignature),

    /// The JWT header names an unsupported algorithm
    #[error(transparent)]
    UnsupportedAlgorithm(#[from] UnsupportedAlgorithm),

    /// The signature does not match
    #[error(transparent)]
    SignatureMismatch(#[from] SignatureMismatch),
}

impl JwtVerifyError {
    /// The coarse classification of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedToken(_)
            | Self::MalformedTokenHeader(_)
            | Self::MalformedTokenPayload(_)
            | Self::MalformedTokenSignature(_) => ErrorKind::MalformedToken,
            Self::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Self::SignatureMismatch(_) => ErrorKind::SignatureInvalid,
        }
    }

    /// Whether the token is structurally invalid
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedToken
    }

    /// Whether the token named an unsupported algorithm
    #[must_use]
    pub fn is_unsupported_algorithm(&self) -> bool {
        matches!(self, Self::UnsupportedAlgorithm(_))
    }

    /// Whether the error is due to a signature mismatch
    #[must_use]
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, Self::SignatureMismatch(_))
    }
}

/// An error occurring when checking the time claims of a JWT
#[derive(Debug, Error)]
pub enum ClaimsRejected {
    /// The token is expired according to the `exp` claim
    #[error("token expired")]
    TokenExpired,

    /// The token is not yet valid according to the `nbf` claim
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// The token claims to be issued in the future according to the `iat` claim
    #[error("token issued in the future")]
    IssuedInFuture,

    /// A required claim is missing
    #[error("required {_0} claim missing")]
    MissingRequiredClaim(&'static str),

    /// A claim is present but does not hold a usable value
    #[error("{_0} claim is not a valid numeric date")]
    MalformedClaim(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_errors_classify() {
        let malformed = JwtVerifyError::from(malformed_jwt("expected three sections"));
        assert_eq!(malformed.kind(), ErrorKind::MalformedToken);
        assert!(malformed.is_malformed());
        assert_eq!(
            malformed.to_string(),
            "malformed JWT: expected three sections"
        );

        let alg = JwtVerifyError::from(unsupported_algorithm("none"));
        assert_eq!(alg.kind(), ErrorKind::UnsupportedAlgorithm);
        assert!(alg.is_unsupported_algorithm());
        assert_eq!(alg.to_string(), "'none' is not a supported signing algorithm");

        let sig = JwtVerifyError::from(signature_mismatch());
        assert_eq!(sig.kind(), ErrorKind::SignatureInvalid);
        assert!(sig.is_signature_mismatch());
        assert!(!sig.is_malformed());
    }

    #[test]
    fn malformed_sections_keep_their_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = JwtVerifyError::from(malformed_jwt_header(cause));
        assert!(err.is_malformed());

        let source = err.source().expect("header error has a cause");
        assert!(source.to_string().contains("EOF"));
    }

    #[test]
    fn signing_errors_are_encoding() {
        let cause = unexpected("claims refused to serialize");
        let err = JwtSigningError::from(malformed_jwt_payload(cause));
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(err.to_string(), "malformed JWT payload");
    }
}
