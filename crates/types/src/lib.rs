//! # Clinic Types
//!
//! Small validated value types shared by the clinic queue crates.
//!
//! Each type checks its invariant once, at construction, so the rest of the workspace can pass
//! values around without re-validating them:
//! - [`NonEmptyText`] for required free-text fields such as a patient name
//! - [`ScheduledAt`] for appointment slots at minute precision
//! - [`AnalyticsWindow`] for the trailing window of the per-day analytics

use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input could not be read as a local date-time
    #[error("invalid date-time '{0}' (expected YYYY-MM-DDTHH:MM)")]
    InvalidTimestamp(String),
    /// The requested analytics window is not one of the supported sizes
    #[error("unsupported analytics window: {0} days (expected 7, 14 or 30)")]
    UnsupportedWindow(String),
}

// ============================================================================
// NonEmptyText
// ============================================================================

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so
/// `"  Ana "` becomes `"Ana"` and `"   "` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// ScheduledAt
// ============================================================================

/// Input layouts accepted for a slot, most specific first.
const SLOT_INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Wire layout for a slot: minute precision, literal `:00` seconds, no offset.
const SLOT_WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:00";

/// An appointment slot as a local date-time truncated to the minute.
///
/// No timezone is attached. The gateway interprets the value in its own agreed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduledAt(NaiveDateTime);

impl ScheduledAt {
    /// Parses a local date-time such as `2026-02-18T15:00` or `2026-02-18 15:00`.
    ///
    /// Seconds, when present, are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] for blank input and [`TypeError::InvalidTimestamp`] when
    /// none of the accepted layouts match.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }

        SLOT_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(Self::from_naive)
            .ok_or_else(|| TypeError::InvalidTimestamp(trimmed.to_owned()))
    }

    /// Wraps an existing date-time, dropping seconds and sub-second precision.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }

    /// Renders the value the way the gateway expects it, e.g. `2026-02-18T15:00:00`.
    pub fn to_wire(&self) -> String {
        self.0.format(SLOT_WIRE_FORMAT).to_string()
    }
}

impl fmt::Display for ScheduledAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for ScheduledAt {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for ScheduledAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_wire())
    }
}

// ============================================================================
// AnalyticsWindow
// ============================================================================

/// Trailing window, in days, for the per-day analytics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnalyticsWindow {
    Week,
    #[default]
    Fortnight,
    Month,
}

impl AnalyticsWindow {
    /// All supported windows, smallest first.
    pub const ALL: [AnalyticsWindow; 3] = [Self::Week, Self::Fortnight, Self::Month];

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Fortnight => 14,
            Self::Month => 30,
        }
    }
}

impl TryFrom<u32> for AnalyticsWindow {
    type Error = TypeError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or_else(|| TypeError::UnsupportedWindow(days.to_string()))
    }
}

impl FromStr for AnalyticsWindow {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .map_err(|_| TypeError::UnsupportedWindow(trimmed.to_owned()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for AnalyticsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}
