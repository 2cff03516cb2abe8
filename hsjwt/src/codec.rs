//! Issuing and accepting tokens
//!
//! [`TokenCodec`] ties the pieces together: it fixes the header, signs the
//! serialized claims, and runs the full acceptance pipeline on the way back.
//!
//! The codec keeps no state between calls and is safe to share between
//! threads.

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error,
    jwa::Algorithm,
    jwt::{Claims, Headers, Jwt, JwtRef},
};

/// Produces and accepts HS512-signed compact JWTs
///
/// ```
/// use hsjwt::{jwt::Claims, TokenCodec};
///
/// let codec = TokenCodec::new();
/// let claims = Claims::new().with_subject("alice");
///
/// let token = codec.generate(&claims, "secret").unwrap();
///
/// assert_eq!(codec.parse(token.as_str(), "secret").unwrap(), claims);
/// assert!(codec.verify(token.as_str(), "secret"));
/// assert!(!codec.verify(token.as_str(), "other secret"));
/// ```
///
/// Parsing does not check `exp` or any other claim. See
/// [`TimingValidator`][crate::TimingValidator].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[must_use]
pub struct TokenCodec {
    alg: Algorithm,
}

impl TokenCodec {
    /// Constructs a codec for the default (and only) algorithm, HS512
    #[inline]
    pub const fn new() -> Self {
        Self {
            alg: Algorithm::HS512,
        }
    }

    /// The algorithm used to sign, and the only one accepted
    #[inline]
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.alg
    }

    /// Signs `claims` under `key`, producing a compact token
    ///
    /// `claims` may be a [`Claims`] set or any serializable type that
    /// produces a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `claims` cannot be serialized to JSON, or if it
    /// serializes to something other than an object.
    pub fn generate<C>(
        &self,
        claims: &C,
        key: impl AsRef<[u8]>,
    ) -> Result<Jwt, error::JwtSigningError>
    where
        C: Serialize + ?Sized,
    {
        let headers = Headers::new(self.alg);
        let result = Jwt::try_from_parts_with_signature(&headers, claims, key.as_ref());

        match &result {
            Ok(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(alg = %self.alg, "token generated");
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    alg = %self.alg,
                    error.kind = %error.kind(),
                    "token generation failed"
                );
                let _ = error;
            }
        }

        result
    }

    /// Verifies `token` under `key` and returns its claims
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, names an algorithm other
    /// than HS512, carries a signature that does not match, or has a
    /// payload that is not a JSON object.
    pub fn parse(&self, token: &str, key: impl AsRef<[u8]>) -> Result<Claims, error::JwtVerifyError> {
        self.parse_into(token, key)
    }

    /// Verifies `token` under `key` and deserializes its claims into `C`
    ///
    /// # Errors
    ///
    /// As [`parse()`][Self::parse()], and also if the authenticated payload
    /// does not fit `C`.
    pub fn parse_into<C>(
        &self,
        token: &str,
        key: impl AsRef<[u8]>,
    ) -> Result<C, error::JwtVerifyError>
    where
        C: DeserializeOwned,
    {
        let result = JwtRef::from_str(token)
            .decompose()
            .and_then(|decomposed| decomposed.verify(key.as_ref()));

        match &result {
            Ok(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(alg = %self.alg, "token accepted");
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error.kind = %error.kind(), "token rejected");
                let _ = error;
            }
        }

        result
    }

    /// Whether `token` is accepted under `key`
    ///
    /// `true` exactly when [`parse()`][Self::parse()] would succeed. The
    /// reason for a rejection is not available here; use `parse()` for that.
    #[must_use]
    pub fn verify(&self, token: &str, key: impl AsRef<[u8]>) -> bool {
        self.parse(token, key).is_ok()
    }
}
