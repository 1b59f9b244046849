//! # Temporal Types — UTC-Only Timestamps and Clocks
//!
//! Defines `Timestamp`, a UTC-only timestamp type rendered as ISO-8601 with
//! a `Z` suffix and seconds precision, and the [`Clock`] seam through which
//! the issuer reads the current time.
//!
//! ## Security Invariant
//!
//! Both `issuanceDate` and `proof.created` are emitted as
//! `YYYY-MM-DDTHH:MM:SSZ`. A local offset would make the same instant
//! serialize differently, and the string is part of the signed payload.
//!
//! Parsing is strict: only the `Z` suffix is accepted. Documents carrying
//! fractional seconds (`2024-03-01T09:15:02.481920Z`) parse fine; the
//! fraction is dropped from the typed view, while the verifier still signs
//! over the original string because it canonicalizes the raw document.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimestampError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO-8601 string, rejecting non-`Z` offsets.
///
/// Serializes as the ISO-8601 string; deserializes through [`Timestamp::parse()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO-8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only timestamps ending in `Z` are
    /// accepted; `+00:00` is rejected even though it denotes the same
    /// instant.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if the string is not RFC 3339 or does not
    /// use the `Z` suffix.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError {
                input: s.to_string(),
                reason: "must use the Z suffix (UTC only)".to_string(),
            });
        }

        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| TimestampError {
                input: secs.to_string(),
                reason: "out of range for a Unix timestamp".to_string(),
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO-8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Render as a compact `YYYYmmdd_HHMMSS` stamp, suitable for file names.
    pub fn to_file_stamp(&self) -> String {
        self.0.format("%Y%m%d_%H%M%S").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of the current UTC time.
///
/// The issuer stamps `issuanceDate` and `proof.created` from a `Clock`
/// rather than calling `Utc::now()` directly, so tests can pin time.
pub trait Clock: Send + Sync {
    /// The current time, truncated to seconds.
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    /// Freeze time at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
