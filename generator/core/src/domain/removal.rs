// Copyright (c) 2026 tccprofile contributors
// SPDX-License-Identifier: Apache-2.0
//! Removal schedule: converts a local wall-clock time on the *target* machine
//! into the absolute instant stored as the profile's `RemovalDate`.
//!
//! Daylight saving is never guessed. A local time that occurs twice or not at
//! all in the target time zone is rejected.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Accepted removal date format, e.g. `2018-09-29 14:30`.
pub const REMOVAL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(
        "A time zone for the target Mac must be provided with a removal date, \
         for example --timezone \"Australia/Brisbane\". The build machine's time zone may differ from the target's"
    )]
    MissingTimezone,

    #[error("A time zone was given without a removal date; both must be provided together")]
    MissingTimestamp,

    #[error("Invalid removal date '{value}': expected \"YYYY-mm-dd HH:MM\"")]
    InvalidTimestamp { value: String },

    #[error("Unknown time zone '{0}': expected an IANA name such as \"Australia/Brisbane\"")]
    UnknownTimezone(String),

    #[error("Removal time {local} is ambiguous in {timezone} because of a daylight saving change; pick another time")]
    AmbiguousLocalTime { local: String, timezone: String },

    #[error("Removal time {local} does not exist in {timezone} because of a daylight saving change; pick another time")]
    NonexistentLocalTime { local: String, timezone: String },
}

/// Resolve the optional removal instant.
///
/// Returns `Ok(None)` when neither value is supplied. Supplying exactly one
/// of the two is an error; the host's own time zone is never substituted.
pub fn removal_instant(
    timestamp: Option<&str>,
    timezone: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ScheduleError> {
    let (timestamp, timezone) = match (timestamp, timezone) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(ScheduleError::MissingTimezone),
        (None, Some(_)) => return Err(ScheduleError::MissingTimestamp),
        (Some(ts), Some(tz)) => (ts.trim(), tz.trim()),
    };

    let local = NaiveDateTime::parse_from_str(timestamp, REMOVAL_DATE_FORMAT).map_err(|_| {
        ScheduleError::InvalidTimestamp {
            value: timestamp.to_string(),
        }
    })?;

    let tz: Tz = timezone
        .parse()
        .map_err(|_| ScheduleError::UnknownTimezone(timezone.to_string()))?;

    match tz.from_local_datetime(&local) {
        LocalResult::Single(at) => {
            let utc = at.with_timezone(&Utc);
            tracing::debug!(local = %local, timezone = %tz, utc = %utc, "Resolved removal date");
            Ok(Some(utc))
        }
        LocalResult::Ambiguous(_, _) => Err(ScheduleError::AmbiguousLocalTime {
            local: timestamp.to_string(),
            timezone: timezone.to_string(),
        }),
        LocalResult::None => Err(ScheduleError::NonexistentLocalTime {
            local: timestamp.to_string(),
            timezone: timezone.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_absent_when_neither_supplied() {
        assert_eq!(removal_instant(None, None), Ok(None));
    }

    #[test]
    fn test_requires_both_values() {
        assert_eq!(
            removal_instant(Some("2018-09-29 14:30"), None),
            Err(ScheduleError::MissingTimezone)
        );
        assert_eq!(
            removal_instant(None, Some("Australia/Brisbane")),
            Err(ScheduleError::MissingTimestamp)
        );
    }

    #[test]
    fn test_converts_to_utc() {
        let instant = removal_instant(Some("2018-09-29 14:30"), Some("Australia/Brisbane"))
            .unwrap()
            .unwrap();
        assert_eq!(instant.to_rfc3339(), "2018-09-29T04:30:00+00:00");
        assert_eq!(instant.minute(), 30);
    }

    #[test]
    fn test_rejects_nonexistent_local_time() {
        // Clocks in Sydney skip from 02:00 to 03:00 on this date.
        let result = removal_instant(Some("2018-10-07 02:30"), Some("Australia/Sydney"));
        assert!(matches!(result, Err(ScheduleError::NonexistentLocalTime { .. })));
    }

    #[test]
    fn test_rejects_ambiguous_local_time() {
        // 01:30 happened twice in New York when daylight saving ended.
        let result = removal_instant(Some("2002-10-27 01:30"), Some("America/New_York"));
        assert!(matches!(result, Err(ScheduleError::AmbiguousLocalTime { .. })));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(
            removal_instant(Some("29/09/2018"), Some("Australia/Brisbane")),
            Err(ScheduleError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            removal_instant(Some("2018-09-29 14:30"), Some("Mars/Olympus_Mons")),
            Err(ScheduleError::UnknownTimezone(_))
        ));
    }
}
