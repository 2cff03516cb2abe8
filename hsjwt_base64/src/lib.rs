//! A byte buffer that represents itself as URL-safe base64
//!
//! The [`hsjwt_base64`][] crate holds the one encoding that compact JSON Web
//! Tokens are built from: the URL-safe alphabet of [RFC4648 §5][], with no
//! padding.
//!
//! Data is held in its raw form. The cost of encoding is only paid when the
//! buffer is displayed or formatted for debugging, and the cost of decoding
//! is only paid by [`Base64Url::from_encoded()`].
//!
//! Decoding is strict:
//!
//! * padding characters (`=`) are rejected,
//! * characters outside of `A`–`Z`, `a`–`z`, `0`–`9`, `-`, `_` are rejected,
//! * non-canonical encodings (non-zero trailing bits) are rejected.
//!
//! A token segment therefore has exactly one accepted spelling.
//!
//! The underlying encoding/decoding mechanism is provided by the [`base64`][]
//! crate.
//!
//!   [`hsjwt_base64`]: crate
//!   [`base64`]: https://docs.rs/base64
//!   [RFC4648 §5]: https://tools.ietf.org/html/rfc4648#section-5
//!
//! # Example
//!
//! ```
//! use hsjwt_base64::Base64Url;
//!
//! let data = Base64Url::from_raw(r#"{"alg":"HS512","typ":"JWT"}"#);
//! assert_eq!(data.to_string(), "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9");
//!
//! let decoded = Base64Url::from_encoded("eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9").unwrap();
//! assert_eq!(decoded, data);
//! ```
//!
//! Padded input is not accepted:
//!
//! ```
//! use hsjwt_base64::Base64Url;
//!
//! assert!(Base64Url::from_encoded("Zg==").is_err());
//! assert!(Base64Url::from_encoded("Zg").is_ok());
//! ```

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
    unused_must_use
)]
#![forbid(unsafe_code)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// An error while decoding a value which is not canonical, unpadded
/// base64url data
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidBase64Data {
    source: base64::DecodeError,
}

impl From<base64::DecodeError> for InvalidBase64Data {
    fn from(err: base64::DecodeError) -> Self {
        Self { source: err }
    }
}

impl fmt::Display for InvalidBase64Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid base64url data")
    }
}

impl Error for InvalidBase64Data {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Owned data to be encoded as URL-safe base64 (no padding)
///
/// Encoding alphabet: `A`–`Z`, `a`–`z`, `0`–`9`, `-`, `_`
///
/// Implementations of the [`From`] trait assume that the value provided is
/// raw data, not data that is already encoded.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
#[must_use]
pub struct Base64Url(Vec<u8>);

impl Base64Url {
    /// Creates an empty buffer
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Wraps raw data
    ///
    /// Free for [`Vec<u8>`]; other types are copied into a new buffer.
    /// To decode data that is already base64url-encoded, use
    /// [`from_encoded()`][Self::from_encoded()].
    #[inline]
    pub fn from_raw<T: Into<Vec<u8>>>(raw: T) -> Self {
        Self(raw.into())
    }

    /// Decodes a base64url-encoded value into a new buffer
    ///
    /// # Errors
    ///
    /// Returns an error if `enc` is padded, contains characters outside of
    /// the URL-safe alphabet, has an impossible length, or is not the
    /// canonical encoding of its bytes.
    pub fn from_encoded<T: AsRef<[u8]>>(enc: T) -> Result<Self, InvalidBase64Data> {
        let data = URL_SAFE_NO_PAD.decode(enc)?;
        Ok(Self(data))
    }

    /// Encodes the buffer into a new string
    #[inline]
    #[must_use]
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0)
    }

    /// Appends the encoding of the buffer onto `buf`
    #[inline]
    pub fn encode_into(&self, buf: &mut String) {
        URL_SAFE_NO_PAD.encode_string(&self.0, buf);
    }

    /// Unwraps the underlying buffer
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// Provides access to the underlying bytes
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Provides mutable access to the underlying bytes
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// The number of raw bytes held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The length of the encoding of this buffer
    #[inline]
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        Self::calc_encoded_len(self.0.len())
    }

    /// Calculates the length of the unpadded encoding of `len` raw bytes
    #[inline]
    #[must_use]
    pub const fn calc_encoded_len(len: usize) -> usize {
        let d = len / 3 * 4;
        match len % 3 {
            0 => d,
            m => d + m + 1,
        }
    }
}

impl From<Vec<u8>> for Base64Url {
    #[inline]
    fn from(buf: Vec<u8>) -> Self {
        Self(buf)
    }
}

impl From<&'_ [u8]> for Base64Url {
    #[inline]
    fn from(slice: &[u8]) -> Self {
        Self::from_raw(slice)
    }
}

impl From<Base64Url> for Vec<u8> {
    #[inline]
    fn from(val: Base64Url) -> Self {
        val.0
    }
}

impl AsRef<[u8]> for Base64Url {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base64Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// The encoded form, fenced in backticks
impl fmt::Debug for Base64Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}`", self.encode())
    }
}
