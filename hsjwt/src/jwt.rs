//! JSON Web Tokens in compact serialization
//!
//! The specifications for this standard can be found in [RFC7519][].
//!
//! A token is three base64url sections separated by `.`:
//!
//! ```text
//! eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.eyJleHAiOjk5OTk5OTk5OTk5fQ.rMKkGe6r…
//! ```
//!
//! The first section is the header, a JSON object naming the signing
//! algorithm. The second is the payload, a JSON object holding the claims.
//! The third is the HMAC over the first two sections, as they appear in the
//! token, joined by the `.`.
//!
//! Nothing in the header or payload should be trusted before the signature
//! has been checked. [`JwtRef::decompose()`] gives access to the untrusted
//! parts; [`Decomposed::verify()`] is the only way to obtain claims from them.
//!
//! [RFC7519]: https://tools.ietf.org/html/rfc7519

use std::fmt;

use aliri_braid::braid;
use hsjwt_base64::Base64Url;
use hsjwt_clock::{Clock, System, UnixTime};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error, jwa};

/// The header of a JWT
///
/// Serializes as `{"alg":"HS512","typ":"JWT"}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[must_use]
pub struct Headers {
    alg: jwa::Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl Headers {
    /// Constructs the headers for a JWT signed by `alg`
    pub fn new(alg: jwa::Algorithm) -> Self {
        Self {
            alg,
            typ: Some(String::from("JWT")),
        }
    }

    /// The signing algorithm
    #[must_use]
    pub fn alg(&self) -> jwa::Algorithm {
        self.alg
    }

    /// The declared media type, if any
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.typ.as_deref()
    }
}

/// The header as found on the wire, before the algorithm is pinned
#[derive(Deserialize)]
struct RawHeaders {
    alg: String,
    #[serde(default)]
    typ: Option<Value>,
}

impl RawHeaders {
    /// `typ` is advisory; a value that is not a string is dropped
    fn typ(self) -> Option<String> {
        match self.typ {
            Some(Value::String(typ)) => Some(typ),
            _ => None,
        }
    }
}

/// The claims carried by a JWT
///
/// Claims are an arbitrary JSON object. No claim is required or interpreted
/// by the codec; in particular, `exp` is **not** checked when a token is
/// parsed. Use a [`TimingValidator`][crate::TimingValidator] to check time
/// claims.
///
/// Claims serialize with their names in sorted order.
///
/// ```
/// use hsjwt::jwt::Claims;
/// use serde_json::json;
///
/// let claims = Claims::new()
///     .with_subject("alice")
///     .with_claim("roles", json!(["admin", "ops"]));
///
/// assert_eq!(claims.get("sub"), Some(&json!("alice")));
/// assert_eq!(
///     serde_json::to_string(&claims).unwrap(),
///     r#"{"roles":["admin","ops"],"sub":"alice"}"#,
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Constructs an empty claim set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets the claim `name` to `value`
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Sets the claim `name` to `value`, returning any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// The value of the claim `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Removes the claim `name`, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Whether the claim `name` is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the claims in name order
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    /// Provides access to the underlying JSON object
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwraps the underlying JSON object
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Sets the `iss` claim
    pub fn with_issuer(self, iss: impl Into<String>) -> Self {
        self.with_claim("iss", iss.into())
    }

    /// Sets the `sub` claim
    pub fn with_subject(self, sub: impl Into<String>) -> Self {
        self.with_claim("sub", sub.into())
    }

    /// Sets the `exp` claim
    pub fn with_expiration(self, time: UnixTime) -> Self {
        self.with_claim("exp", time.0)
    }

    /// Sets the `exp` claim `secs` seconds from now on the system clock
    pub fn with_future_expiration(self, secs: u64) -> Self {
        self.with_future_expiration_from_clock(secs, &System)
    }

    /// Sets the `exp` claim `secs` seconds from now on the specified clock
    pub fn with_future_expiration_from_clock<C: Clock>(self, secs: u64, clock: &C) -> Self {
        self.with_expiration(clock.now().saturating_add(secs))
    }

    /// Sets the `nbf` claim
    pub fn with_not_before(self, time: UnixTime) -> Self {
        self.with_claim("nbf", time.0)
    }

    /// Sets the `iat` claim
    pub fn with_issued_at(self, time: UnixTime) -> Self {
        self.with_claim("iat", time.0)
    }

    /// Sets the `iat` claim to now on the specified clock
    pub fn with_issued_now_from_clock<C: Clock>(self, clock: &C) -> Self {
        self.with_issued_at(clock.now())
    }
}

impl From<Map<String, Value>> for Claims {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Claims> for Map<String, Value> {
    #[inline]
    fn from(claims: Claims) -> Self {
        claims.0
    }
}

impl FromIterator<(String, Value)> for Claims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(Map::from_iter(iter))
    }
}

impl IntoIterator for Claims {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Claims {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A JWT split into its sections, with the header already checked
///
/// The header is known to name the supported algorithm, but neither the
/// header nor the payload has been authenticated yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Decomposed<'a> {
    header: Headers,
    message: &'a str,
    payload: &'a str,
    payload_raw: Base64Url,
    signature: Base64Url,
}

macro_rules! expect_three {
    ($iter:expr) => {{
        let mut i = $iter;
        match (i.next(), i.next(), i.next(), i.next()) {
            (Some(first), Some(second), Some(third), None) => Some((first, second, third)),
            _ => None,
        }
    }};
}

impl<'a> Decomposed<'a> {
    /// Checks the signature under `key`, then deserializes the payload
    ///
    /// # Errors
    ///
    /// Returns an error if the signature does not match, or if the
    /// authenticated payload cannot be deserialized into `C`.
    pub fn verify<C>(self, key: &[u8]) -> Result<C, error::JwtVerifyError>
    where
        C: DeserializeOwned,
    {
        self.header.alg().verify(
            key,
            self.message.as_bytes(),
            self.signature.as_slice(),
        )?;

        let claims = serde_json::from_slice(self.payload_raw.as_slice())
            .map_err(error::malformed_jwt_payload)?;

        Ok(claims)
    }

    /// The untrusted header of the JWT
    ///
    /// **WARNING:** *The algorithm has been checked, but nothing else in the
    /// header has been authenticated.* Use [`verify()`][Self::verify()] before
    /// acting on the token.
    pub fn untrusted_header(&self) -> &Headers {
        &self.header
    }

    /// The untrusted, still encoded payload of the JWT
    ///
    /// **WARNING:** *This payload has not been authenticated and should not be
    /// trusted.* Use [`verify()`][Self::verify()] to obtain the claims.
    #[must_use]
    pub fn untrusted_payload(&self) -> &'a str {
        self.payload
    }

    /// The signing input: the encoded header and payload joined by `.`
    ///
    /// **WARNING:** *This message has not been authenticated and should not be
    /// trusted.*
    #[must_use]
    pub fn untrusted_message(&self) -> &'a str {
        self.message
    }

    /// The raw signature of the JWT
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        self.signature.as_slice()
    }
}

/// A JSON Web Token
///
/// This type provides custom implementations of [`Display`][JwtRef#impl-Display] and
/// [`Debug`][JwtRef#impl-Debug] so that tokens do not end up in logs by accident.
/// See the documentation on those trait implementations on the [`JwtRef`] type for more
/// information.
#[braid(
    serde,
    debug = "owned",
    display = "owned",
    ord = "omit",
    ref_doc = "\
    A borrowed reference to a JSON Web Token ([`Jwt`])\n\
    \n\
    This type provides custom implementations of [`Display`][Self#impl-Display] and \
    [`Debug`][Self#impl-Debug] so that tokens do not end up in logs by accident. \
    See the documentation on those trait implementations for more information.
    "
)]
#[must_use]
pub struct Jwt;

impl Jwt {
    /// Serializes `headers` and `payload` and signs them under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if either the headers or the payload cannot be
    /// serialized to JSON, or if the payload is not a JSON object.
    pub fn try_from_parts_with_signature<P>(
        headers: &Headers,
        payload: &P,
        key: &[u8],
    ) -> Result<Self, error::JwtSigningError>
    where
        P: Serialize + ?Sized,
    {
        let alg = headers.alg();
        let h_raw =
            Base64Url::from_raw(serde_json::to_vec(headers).map_err(error::malformed_jwt_header)?);
        let p_raw = match serde_json::to_value(payload).map_err(error::malformed_jwt_payload)? {
            claims @ Value::Object(_) => Base64Url::from_raw(
                serde_json::to_vec(&claims).map_err(error::malformed_jwt_payload)?,
            ),
            _ => return Err(error::malformed_jwt_payload("claims must be a JSON object").into()),
        };

        let expected_len = h_raw.encoded_len()
            + p_raw.encoded_len()
            + Base64Url::calc_encoded_len(alg.signature_size())
            + 2;

        let mut token = String::with_capacity(expected_len);
        h_raw.encode_into(&mut token);
        token.push('.');
        p_raw.encode_into(&mut token);

        let signature = Base64Url::from_raw(alg.sign(key, token.as_bytes()));
        token.push('.');
        signature.encode_into(&mut token);

        debug_assert_eq!(token.len(), expected_len);

        Ok(Self::new(token))
    }
}

impl JwtRef {
    /// Splits the JWT into its sections and checks the header
    ///
    /// No cryptographic work is done here. The header must decode to a JSON
    /// object whose `alg` is the supported algorithm; the payload and
    /// signature sections must be valid base64url, but the payload is not
    /// interpreted.
    ///
    /// # Errors
    ///
    /// Returns an error if the JWT does not have exactly three non-empty
    /// sections, if any section is not unpadded base64url, if the header
    /// is not a JSON object with a string `alg`, or if `alg` is not
    /// supported.
    pub fn decompose(&self) -> Result<Decomposed<'_>, error::JwtVerifyError> {
        let token = self.as_str();

        let (h_str, p_str, s_str) = expect_three!(token.split('.'))
            .ok_or_else(|| error::malformed_jwt("expected three sections"))?;

        if h_str.is_empty() || p_str.is_empty() || s_str.is_empty() {
            return Err(error::malformed_jwt("empty section").into());
        }

        let message = &token[..h_str.len() + 1 + p_str.len()];

        let h_raw = Base64Url::from_encoded(h_str).map_err(error::malformed_jwt_header)?;
        let raw: RawHeaders =
            serde_json::from_slice(h_raw.as_slice()).map_err(error::malformed_jwt_header)?;
        let alg = jwa::Algorithm::try_from(raw.alg.as_str())?;

        let payload_raw = Base64Url::from_encoded(p_str).map_err(error::malformed_jwt_payload)?;
        let signature = Base64Url::from_encoded(s_str).map_err(error::malformed_jwt_signature)?;

        Ok(Decomposed {
            header: Headers {
                alg,
                typ: raw.typ(),
            },
            message,
            payload: p_str,
            payload_raw,
            signature,
        })
    }
}

/// By default, this type holds sensitive information. To prevent
/// unintentional disclosure, this type will not print out its contents
/// unless the alternate debug format, i.e. `{:#?}`, is specified. In that
/// form, it prints the header and payload sections, but omits the signature.
/// To reveal part of the signature, specify the number of characters as a
/// width, i.e. `{:#25?}`.
///
/// Otherwise, a placeholder is printed.
///
/// If the token does not contain a `.` character, then the limitations
/// above apply to the token as a whole.
///
/// # Example
///
/// ```
/// # use hsjwt::jwt::JwtRef;
/// #
/// let token = JwtRef::from_str(concat!(
///     "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
///     "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
///     "rMKkGe6riuLZ3boYiMZsk5xrT7S-7VK6gZmFs1_7kKtVUkpvGatudYI5ZSkwIQ-iJKp2XskCxzn_6fVkCohtUQ"
/// ));
///
/// assert_eq!(format!("{:?}", token), "***JWT***");
/// assert_eq!(format!("{:#?}", token), concat!(
///     "\"eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
///     "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
///     "…\""
/// ));
/// assert_eq!(format!("{:#5?}", token), concat!(
///     "\"eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
///     "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
///     "rMKk…\""
/// ));
/// ```
impl fmt::Debug for JwtRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            f.write_str("\"")?;
            reveal(&self.0, f, 0)?;
            f.write_str("\"")
        } else {
            f.write_str(REDACTED)
        }
    }
}

/// By default, this type holds sensitive information. To prevent
/// unintentional disclosure, this type will not print out its contents
/// unless the alternate format, i.e. `{:#}`, is specified. In that form, the
/// entire token is printed. To elide part of the signature, specify the
/// number of characters to keep as a width, i.e. `{:#10}`.
///
/// Otherwise, a placeholder is printed.
///
/// # Example
///
/// ```
/// # use hsjwt::jwt::JwtRef;
/// #
/// let token = JwtRef::from_str(concat!(
///     "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
///     "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
///     "rMKkGe6riuLZ3boYiMZsk5xrT7S-7VK6gZmFs1_7kKtVUkpvGatudYI5ZSkwIQ-iJKp2XskCxzn_6fVkCohtUQ"
/// ));
///
/// assert_eq!(format!("{}", token), "***JWT***");
/// assert_eq!(format!("{:#}", token), token.as_str());
/// assert_eq!(format!("{:#5}", token), concat!(
///     "eyJhbGciOiJIUzUxMiIsInR5cCI6IkpXVCJ9.",
///     "eyJleHAiOjk5OTk5OTk5OTk5fQ.",
///     "rMKk…"
/// ));
/// ```
impl fmt::Display for JwtRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            reveal(&self.0, f, usize::MAX)
        } else {
            f.write_str(REDACTED)
        }
    }
}

const REDACTED: &str = "***JWT***";

/// Writes everything up to the last `.`, then at most `width` characters of
/// what follows (`default_len` if no width is given), eliding the rest.
fn reveal(token: &str, f: &mut fmt::Formatter, default_len: usize) -> fmt::Result {
    let protected = match token.rfind('.') {
        Some(last_period) => {
            f.write_str(&token[..=last_period])?;
            &token[last_period + 1..]
        }
        None => token,
    };

    let max_len = f.width().unwrap_or(default_len);
    if max_len <= 1 {
        f.write_str("…")
    } else if max_len > protected.len() {
        f.write_str(protected)
    } else {
        match protected.char_indices().nth(max_len - 2) {
            Some((idx, c)) if idx + c.len_utf8() < protected.len() => {
                f.write_str(&protected[..idx + c.len_utf8()])?;
                f.write_str("…")
            }
            _ => f.write_str(protected),
        }
    }
}
