//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines [`Timestamp`], a UTC-only timestamp truncated to seconds
//! precision. Deadlines, vote times, and resolution times all flow through
//! this type, so every serialized instant is `YYYY-MM-DDTHH:MM:SSZ` —
//! no sub-seconds, no local offsets.
//!
//! Non-UTC inputs are **rejected at construction**; there is no silent
//! conversion that could introduce ambiguity between replicas.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(0))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Parse an RFC 3339 string, **rejecting non-`Z` offsets** — even
    /// `+00:00`, which is semantically equivalent but not canonical.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the string is not
    /// valid RFC 3339 or does not end in `Z`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|_| ValidationError::InvalidTimestamp(s.to_string()))?;
        Ok(Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
    }

    /// The underlying UTC instant.
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Canonical ISO 8601 form: `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_utc().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn parse_accepts_z_suffix() {
        let ts = Timestamp::parse("2026-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn parse_rejects_offsets() {
        assert!(Timestamp::parse("2026-03-01T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-03-01T12:00:00+05:30").is_err());
        assert!(Timestamp::parse("not a timestamp").is_err());
    }

    #[test]
    fn parse_truncates_subseconds() {
        let ts = Timestamp::parse("2026-03-01T12:00:00.999Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-03-01T12:00:00Z");
    }

    #[test]
    fn ordering_follows_time() {
        let a = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let b = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap());
        assert!(a < b);
    }
}
