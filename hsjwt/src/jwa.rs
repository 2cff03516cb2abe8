//! JSON Web Algorithms (JWA) supported by this crate
//!
//! Only HMAC using SHA-512 (`HS512`, [RFC7518 §3.2][]) is implemented.
//! Tokens naming any other algorithm are rejected before any cryptographic
//! work is attempted.
//!
//! [RFC7518 §3.2]: https://tools.ietf.org/html/rfc7518#section-3.2

use std::{convert::TryFrom, fmt, str::FromStr};

use hsjwt_base64::{Base64Url, InvalidBase64Data};
use ring::rand::SecureRandom;
use serde::{Deserialize, Serialize};

use crate::error;

/// Signing algorithms
///
/// This list may be expanded in the future.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(clippy::upper_case_acronyms)]
#[non_exhaustive]
pub enum Algorithm {
    /// HMAC using SHA-512
    #[default]
    HS512,
}

impl Algorithm {
    /// The name of the algorithm as it appears in the `alg` header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HS512 => "HS512",
        }
    }

    /// The size in bytes of a signature
    #[must_use]
    pub const fn signature_size(self) -> usize {
        match self {
            Self::HS512 => 512 / 8,
        }
    }

    /// Recommended size in bytes for a secret
    #[must_use]
    pub const fn recommended_key_size(self) -> usize {
        match self {
            Self::HS512 => 512 / 8,
        }
    }

    fn into_ring_algorithm(self) -> ring::hmac::Algorithm {
        match self {
            Self::HS512 => ring::hmac::HMAC_SHA512,
        }
    }

    /// Computes the MAC of `data` under `key`
    #[must_use]
    pub fn sign(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        let key = ring::hmac::Key::new(self.into_ring_algorithm(), key);
        ring::hmac::sign(&key, data).as_ref().to_owned()
    }

    /// Checks `signature` against the MAC of `data` under `key`
    ///
    /// The comparison takes time independent of where the signatures differ.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not match.
    pub fn verify(
        self,
        key: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<(), error::SignatureMismatch> {
        let key = ring::hmac::Key::new(self.into_ring_algorithm(), key);
        ring::hmac::verify(&key, data, signature).map_err(|_| error::signature_mismatch())
    }
}

impl TryFrom<&'_ str> for Algorithm {
    type Error = error::UnsupportedAlgorithm;

    #[inline]
    fn try_from(value: &'_ str) -> Result<Self, Self::Error> {
        match value {
            "HS512" => Ok(Self::HS512),
            _ => Err(error::unsupported_algorithm(value)),
        }
    }
}

impl FromStr for Algorithm {
    type Err = error::UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HMAC secret
///
/// The codec never holds on to keys; this type exists for callers that want
/// to mint and carry a secret of the recommended size. Any byte string can
/// be used as a key directly.
///
/// The [`Debug`][fmt::Debug] implementation does not reveal the secret.
#[derive(Clone, PartialEq, Eq)]
#[must_use]
pub struct Secret {
    secret: Base64Url,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Secret { .. }")
    }
}

impl Secret {
    /// Wraps the provided secret bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Base64Url::from_raw(secret),
        }
    }

    /// Decodes a secret from its base64url form
    ///
    /// # Errors
    ///
    /// Returns an error if `enc` is not unpadded base64url.
    pub fn from_base64url(enc: &str) -> Result<Self, InvalidBase64Data> {
        let secret = Base64Url::from_encoded(enc)?;
        Ok(Self { secret })
    }

    /// Generates a new random secret of the recommended size for `alg`
    ///
    /// # Errors
    ///
    /// Unable to generate a new secret.
    pub fn generate(alg: Algorithm) -> Result<Self, error::Unexpected> {
        Self::generate_with_rng(alg, &ring::rand::SystemRandom::new())
    }

    /// Generates a new secret using the provided source of randomness
    ///
    /// # Errors
    ///
    /// Unable to generate a new secret from the provided RNG.
    pub fn generate_with_rng(
        alg: Algorithm,
        rng: &dyn SecureRandom,
    ) -> Result<Self, error::Unexpected> {
        let mut secret = Base64Url::from_raw(vec![0; alg.recommended_key_size()]);

        rng.fill(secret.as_mut_slice())
            .map_err(|_| error::unexpected("random number generator failure"))?;

        Ok(Self { secret })
    }

    /// The base64url form of the secret
    ///
    /// Treat the result with the same care as the secret itself.
    #[must_use]
    pub fn to_base64url(&self) -> String {
        self.secret.encode()
    }

    /// The raw secret bytes
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.secret.as_slice()
    }
}

impl AsRef<[u8]> for Secret {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.secret.as_slice()
    }
}

impl From<Vec<u8>> for Secret {
    #[inline]
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&'_ [u8]> for Secret {
    #[inline]
    fn from(secret: &[u8]) -> Self {
        Self::new(secret)
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;

    use super::*;
    use crate::test;

    #[test]
    fn parses_only_exact_name() {
        assert_eq!("HS512".parse::<Algorithm>().unwrap(), Algorithm::HS512);

        for name in ["hs512", "HS256", "HS384", "RS512", "none", ""] {
            let err = name.parse::<Algorithm>().unwrap_err();
            assert_eq!(err.alg(), name);
        }
    }

    #[test]
    fn serializes_as_header_value() -> Result<()> {
        assert_eq!(serde_json::to_string(&Algorithm::HS512)?, r#""HS512""#);
        assert_eq!(Algorithm::HS512.to_string(), "HS512");
        Ok(())
    }

    #[test]
    fn sign_matches_known_mac() {
        let mac = Algorithm::HS512.sign(test::KEY.as_bytes(), test::SIGNING_INPUT.as_bytes());
        assert_eq!(mac.len(), Algorithm::HS512.signature_size());
        assert_eq!(Base64Url::from_raw(mac).to_string(), test::SIGNATURE);
    }

    #[test]
    fn verify_accepts_own_signature() {
        let data = b"some data";
        let mac = Algorithm::HS512.sign(b"key", data);
        assert!(Algorithm::HS512.verify(b"key", data, &mac).is_ok());
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let data = b"some data";
        let mac = Algorithm::HS512.sign(b"key", data);
        assert!(Algorithm::HS512
            .verify(b"key", data, &mac[..mac.len() - 1])
            .is_err());
        assert!(Algorithm::HS512.verify(b"key", data, &[]).is_err());
    }

    #[test]
    fn verify_rejects_other_key() {
        let data = b"some data";
        let mac = Algorithm::HS512.sign(b"key", data);
        assert!(Algorithm::HS512.verify(b"kez", data, &mac).is_err());
    }

    #[test]
    fn generated_secrets_have_recommended_size() -> Result<()> {
        let a = Secret::generate(Algorithm::HS512)?;
        let b = Secret::generate(Algorithm::HS512)?;

        assert_eq!(a.as_slice().len(), Algorithm::HS512.recommended_key_size());
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn secret_round_trips_through_base64url() -> Result<()> {
        let secret = Secret::new(test::KEY);
        let restored = Secret::from_base64url(&secret.to_base64url())?;
        assert_eq!(restored, secret);
        assert_eq!(restored.as_ref(), test::KEY.as_bytes());
        Ok(())
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        let dbg = format!("{:?} {:#?}", secret, secret);
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains(&secret.to_base64url()));
    }
}
