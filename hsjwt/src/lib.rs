//! Compact JSON Web Tokens (JWT, [RFC7519][]) signed with HMAC SHA-512
//!
//! This crate issues and accepts tokens of the form
//! `base64url(header).base64url(claims).base64url(signature)`, where the
//! header is always `{"alg":"HS512","typ":"JWT"}` and the signature is the
//! HS512 MAC ([RFC7518 §3.2][]) of the first two sections.
//!
//! Accepting a token checks its shape, its `alg` header, and its signature.
//! Time-based claims such as `exp` are **not** checked during parsing; run a
//! [`TimingValidator`] over the claims when that is wanted.
//!
//! [RFC7519]: https://tools.ietf.org/html/rfc7519
//! [RFC7518 §3.2]: https://tools.ietf.org/html/rfc7518#section-3.2
//!
//! # Example
//!
//! ```
//! use hsjwt::jwt::Claims;
//!
//! let key = "bdacaf398071931518f73917cb0c6f04b3a0ab45ee9cbedc258047a8c149a3e1";
//! let claims = Claims::new().with_claim("exp", 99_999_999_999_u64);
//!
//! let token = hsjwt::generate(&claims, key).unwrap();
//! assert_eq!(
//!     token.as_str(),
//!     concat!(
//!         "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
//!         "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
//!         "rMKkGe6riuLZ3boYiMZsk5xrT7S-7VK6gZmFs1_7kKtVUkpvGatudYI5ZSkwIQ-iJKp2XskCxzn_6fVkCohtUQ"
//!     )
//! );
//!
//! assert_eq!(hsjwt::parse(token.as_str(), key).unwrap(), claims);
//! assert!(hsjwt::verify(token.as_str(), key));
//! assert!(!hsjwt::verify(token.as_str(), "some other key"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

mod codec;
pub mod error;
pub mod jwa;
pub mod jwt;
mod validator;

#[cfg(test)]
pub(crate) mod test;

#[doc(inline)]
pub use codec::TokenCodec;
#[doc(inline)]
pub use jwa::{Algorithm, Secret};
#[doc(inline)]
pub use jwt::{Claims, Jwt, JwtRef};
#[doc(inline)]
pub use validator::TimingValidator;

/// Signs `claims` into a compact HS512 token under `key`
///
/// Shorthand for [`TokenCodec::generate`] on the default codec.
///
/// # Errors
///
/// Returns an error if the claims cannot be serialized as a JSON object.
pub fn generate<C>(claims: &C, key: impl AsRef<[u8]>) -> Result<Jwt, error::JwtSigningError>
where
    C: serde::Serialize + ?Sized,
{
    TokenCodec::new().generate(claims, key)
}

/// Verifies `token` under `key` and returns its claims
///
/// Shorthand for [`TokenCodec::parse`] on the default codec. The `exp` claim
/// is returned like any other claim and is not enforced.
///
/// # Errors
///
/// Returns an error if the token is malformed, names an algorithm other
/// than `HS512`, or carries a signature that does not match.
pub fn parse(token: &str, key: impl AsRef<[u8]>) -> Result<Claims, error::JwtVerifyError> {
    TokenCodec::new().parse(token, key)
}

/// Whether `token` is acceptable under `key`
///
/// Exactly when [`parse`] would succeed.
#[must_use]
pub fn verify(token: &str, key: impl AsRef<[u8]>) -> bool {
    TokenCodec::new().verify(token, key)
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;

    use super::*;
    use crate::test;

    #[test]
    fn free_functions_use_default_codec() -> Result<()> {
        let claims = Claims::new().with_claim("exp", test::EXP);

        let token = generate(&claims, test::KEY)?;
        assert_eq!(token.as_str(), test::TOKEN);
        assert_eq!(parse(test::TOKEN, test::KEY)?, claims);
        assert!(verify(test::TOKEN, test::KEY));
        Ok(())
    }

    #[test]
    fn verify_agrees_with_parse() {
        let tokens = [
            test::TOKEN,
            "",
            "a.b.c",
            test::HEADER,
            &test::TOKEN[..test::TOKEN.len() - 1],
        ];

        for token in tokens {
            for key in [test::KEY, "", "other"] {
                assert_eq!(verify(token, key), parse(token, key).is_ok(), "{token}");
            }
        }
    }
}
