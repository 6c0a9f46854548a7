//! The source of "today" for the store and the aggregators.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Resolves the current calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clock {
    /// The wall-clock date in a canonical timezone, e.g. "Pacific/Auckland".
    Zoned(String),
    /// Always the same date. Used for reproducible reports and tests.
    Fixed(Date),
}

impl Clock {
    /// Create a clock for `canonical_timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the name is not a known canonical timezone.
    pub fn zoned(canonical_timezone: &str) -> Result<Self, Error> {
        match current_offset(canonical_timezone) {
            Some(_) => Ok(Self::Zoned(canonical_timezone.to_owned())),
            None => Err(Error::InvalidTimezone(canonical_timezone.to_owned())),
        }
    }

    /// The current date according to this clock.
    pub fn today(&self) -> Date {
        match self {
            Clock::Zoned(timezone) => {
                // The offset is looked up on every call so that daylight saving changes apply.
                let offset = current_offset(timezone).unwrap_or_else(|| {
                    tracing::warn!("Invalid timezone {timezone}, falling back to UTC");
                    UtcOffset::UTC
                });
                OffsetDateTime::now_utc().to_offset(offset).date()
            }
            Clock::Fixed(date) => *date,
        }
    }
}

/// The UTC offset in effect right now in `canonical_timezone`.
fn current_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}
