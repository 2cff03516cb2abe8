//! Time sources for checking token time claims
//!
//! Token time claims (`exp`, `nbf`, `iat`) are expressed in whole seconds
//! since the Unix epoch. [`Clock`] abstracts over where "now" comes from so
//! that checks against those claims can be exercised deterministically with
//! a [`TestClock`].

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

use std::{fmt, time::SystemTime};

/// Seconds elapsed since 1970-01-01T00:00:00Z
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct UnixTime(pub u64);

impl UnixTime {
    /// The Unix epoch itself
    pub const EPOCH: UnixTime = UnixTime(0);

    /// Adds `secs` seconds, stopping at the largest representable time
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Subtracts `secs` seconds, stopping at the epoch
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, secs: u64) -> Self {
        Self(self.0.saturating_sub(secs))
    }
}

/// Times before the epoch clamp to [`UnixTime::EPOCH`]
impl From<SystemTime> for UnixTime {
    #[inline]
    fn from(t: SystemTime) -> Self {
        t.duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| UnixTime(d.as_secs()))
            .unwrap_or(Self::EPOCH)
    }
}

impl From<u64> for UnixTime {
    #[inline]
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A source of the current time
pub trait Clock {
    /// The current time according to this clock
    fn now(&self) -> UnixTime;
}

impl<C: Clock + ?Sized> Clock for &'_ C {
    #[inline]
    fn now(&self) -> UnixTime {
        C::now(*self)
    }
}

/// The system wall clock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct System;

impl Clock for System {
    #[inline]
    fn now(&self) -> UnixTime {
        UnixTime::from(SystemTime::now())
    }
}

/// A clock that only moves when told to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestClock(UnixTime);

impl Clock for TestClock {
    #[inline]
    fn now(&self) -> UnixTime {
        self.0
    }
}

impl TestClock {
    /// A clock stopped at `time`
    #[inline]
    pub const fn new(time: UnixTime) -> Self {
        Self(time)
    }

    /// Moves the clock to `time`
    pub fn set(&mut self, time: UnixTime) {
        self.0 = time;
    }

    /// Moves the clock forward by `secs` seconds
    pub fn advance(&mut self, secs: u64) {
        self.0 = self.0.saturating_add(secs);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn pre_epoch_clamps() {
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(UnixTime::from(before), UnixTime::EPOCH);
    }

    #[test]
    fn system_time_truncates_to_seconds() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_millis(5_999);
        assert_eq!(UnixTime::from(t), UnixTime(5));
    }

    #[test]
    fn test_clock_moves_on_request() {
        let mut clock = TestClock::new(UnixTime(100));
        assert_eq!(clock.now(), UnixTime(100));

        clock.advance(20);
        assert_eq!(clock.now(), UnixTime(120));

        clock.set(UnixTime(7));
        assert_eq!((&clock).now(), UnixTime(7));
    }

    #[test]
    fn saturates_at_bounds() {
        assert_eq!(UnixTime(u64::MAX).saturating_add(1), UnixTime(u64::MAX));
        assert_eq!(UnixTime(3).saturating_sub(5), UnixTime::EPOCH);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(System.now() > UnixTime::EPOCH);
    }
}
