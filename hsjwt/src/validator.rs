//! Checks on the time claims of an already verified token
//!
//! Parsing a token never looks at `exp`, `nbf`, or `iat`. Callers that want
//! those claims enforced run a [`TimingValidator`] over the parsed claims.
//!
//! ```
//! use hsjwt::{jwt::Claims, TimingValidator};
//! use hsjwt_clock::{TestClock, UnixTime};
//!
//! let claims = Claims::new().with_expiration(UnixTime(100));
//! let validator = TimingValidator::default().with_leeway_secs(5);
//!
//! assert!(validator.validate_with_clock(&claims, &TestClock::new(UnixTime(104))).is_ok());
//! assert!(validator.validate_with_clock(&claims, &TestClock::new(UnixTime(105))).is_err());
//! ```

use std::time::Duration;

use hsjwt_clock::{Clock, System, UnixTime};
use serde_json::Value;

use crate::{error::ClaimsRejected, jwt::Claims};

/// Validates `exp`, `nbf`, and `iat` against a clock
///
/// The default validator checks `exp` and `nbf` when they are present,
/// without any grace period, and does not require either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct TimingValidator {
    leeway: Duration,
    validate_exp: bool,
    require_exp: bool,
    validate_nbf: bool,
    validate_iat: bool,
}

impl Default for TimingValidator {
    #[inline]
    fn default() -> Self {
        Self {
            leeway: Duration::default(),
            validate_exp: true,
            require_exp: false,
            validate_nbf: true,
            validate_iat: false,
        }
    }
}

impl TimingValidator {
    /// Allows a grace period for time checks
    ///
    /// Applies on either side of the "not before" and "expires" claims.
    #[inline]
    pub fn with_leeway(self, leeway: Duration) -> Self {
        Self { leeway, ..self }
    }

    /// Allows a grace period (in seconds) for time checks
    #[inline]
    pub fn with_leeway_secs(self, leeway: u64) -> Self {
        self.with_leeway(Duration::from_secs(leeway))
    }

    /// Rejects tokens without an `exp` claim
    #[inline]
    pub fn require_expiration(self) -> Self {
        Self {
            validate_exp: true,
            require_exp: true,
            ..self
        }
    }

    /// Skips expiration checks
    #[inline]
    pub fn ignore_expiration(self) -> Self {
        Self {
            validate_exp: false,
            require_exp: false,
            ..self
        }
    }

    /// Skips "not valid before" checks
    #[inline]
    pub fn ignore_not_before(self) -> Self {
        Self {
            validate_nbf: false,
            ..self
        }
    }

    /// Rejects tokens whose `iat` claim lies in the future
    #[inline]
    pub fn check_issued_at(self) -> Self {
        Self {
            validate_iat: true,
            ..self
        }
    }

    /// Validates the claims against the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if any enabled check fails.
    pub fn validate(&self, claims: &Claims) -> Result<(), ClaimsRejected> {
        self.validate_with_clock(claims, &System)
    }

    /// Validates the claims against the specified clock
    ///
    /// # Errors
    ///
    /// Returns an error if any enabled check fails.
    pub fn validate_with_clock<C: Clock>(
        &self,
        claims: &Claims,
        clock: &C,
    ) -> Result<(), ClaimsRejected> {
        let now = clock.now();
        let leeway = self.leeway.as_secs();

        if self.validate_exp {
            match numeric_date(claims, "exp")? {
                Some(exp) if now >= exp.saturating_add(leeway) => {
                    return Err(ClaimsRejected::TokenExpired)
                }
                None if self.require_exp => {
                    return Err(ClaimsRejected::MissingRequiredClaim("exp"))
                }
                _ => {}
            }
        }

        if self.validate_nbf {
            if let Some(nbf) = numeric_date(claims, "nbf")? {
                if now.saturating_add(leeway) < nbf {
                    return Err(ClaimsRejected::TokenNotYetValid);
                }
            }
        }

        if self.validate_iat {
            if let Some(iat) = numeric_date(claims, "iat")? {
                if iat > now.saturating_add(leeway) {
                    return Err(ClaimsRejected::IssuedInFuture);
                }
            }
        }

        Ok(())
    }
}

/// Reads a time claim as whole seconds; fractional seconds are truncated
fn numeric_date(claims: &Claims, name: &'static str) -> Result<Option<UnixTime>, ClaimsRejected> {
    let value = match claims.get(name) {
        Some(value) => value,
        None => return Ok(None),
    };

    let secs = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    };

    secs.map(|s| Some(UnixTime(s)))
        .ok_or(ClaimsRejected::MalformedClaim(name))
}
