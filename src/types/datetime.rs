use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::{CalTimezone, ValueError};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::ops::{Add, Sub};

pub(crate) const LOCAL_DATE_TIME: &str = "%Y%m%dT%H%M%S";
pub(crate) const UTC_DATE_TIME: &str = "%Y%m%dT%H%M%SZ";

/// A DATE-TIME value.
///
/// Covers the three RFC 5545 forms:
/// - form 1, `19980118T230000` -> floating
/// - form 2, `19980119T070000Z` -> UTC
/// - form 3, `TZID=America/New_York:19980119T020000` -> zone reference,
///   resolved against the calendar's VTIMEZONEs or the Olson database
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalDateTime(pub(crate) DateTime<CalTimezone>);

impl CalDateTime {
    /// Parse the value of a content line, resolving a TZID parameter
    /// through the calendar's timezone registry.
    pub fn parse_prop(prop: &ContentLine, timezones: &Timezones) -> Result<Self, ValueError> {
        let value = prop
            .value
            .as_deref()
            .ok_or_else(|| ValueError::InvalidDatetimeFormat("empty property".into()))?;
        let timezone = match prop.get_tzid() {
            Some(tzid) => Some(timezones.resolve(tzid)?),
            None => None,
        };
        Self::parse(value, timezone)
    }

    pub fn parse(value: &str, timezone: Option<CalTimezone>) -> Result<Self, ValueError> {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, UTC_DATE_TIME) {
            return Ok(datetime.and_utc().into());
        }

        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, LOCAL_DATE_TIME) {
            let timezone = timezone.unwrap_or(CalTimezone::Floating);
            return datetime
                .and_local_timezone(timezone)
                .earliest()
                .map(Self)
                .ok_or(ValueError::LocalTimeGap);
        }

        Err(ValueError::InvalidDatetimeFormat(value.to_string()))
    }

    /// Interpret a wall-clock time in the given timezone.
    pub fn from_local(local: NaiveDateTime, timezone: CalTimezone) -> Result<Self, ValueError> {
        local
            .and_local_timezone(timezone)
            .earliest()
            .map(Self)
            .ok_or(ValueError::LocalTimeGap)
    }

    /// The latest representable instant, used as the advisory bound for
    /// recurrences without UNTIL or a small COUNT.
    #[must_use]
    pub fn far_future() -> Self {
        DateTime::<Utc>::MAX_UTC.into()
    }

    #[must_use]
    pub fn utc(&self) -> DateTime<Utc> {
        self.0.to_utc()
    }

    /// Wall-clock time in the value's own timezone. Recurrence iteration
    /// happens on this clock so occurrences keep their local time across
    /// DST transitions.
    #[must_use]
    pub fn naive_local(&self) -> NaiveDateTime {
        self.0.naive_local()
    }

    #[must_use]
    pub fn timezone(&self) -> CalTimezone {
        self.0.timezone()
    }

    #[must_use]
    pub fn format(&self) -> String {
        if self.timezone().is_utc() {
            self.0.format(UTC_DATE_TIME).to_string()
        } else {
            self.0.format(LOCAL_DATE_TIME).to_string()
        }
    }

    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.clone().checked_add_signed(duration).map(Self)
    }
}

impl From<DateTime<CalTimezone>> for CalDateTime {
    fn from(value: DateTime<CalTimezone>) -> Self {
        Self(value)
    }
}

impl From<DateTime<Utc>> for CalDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.with_timezone(&CalTimezone::utc()))
    }
}

impl From<CalDateTime> for DateTime<Utc> {
    fn from(value: CalDateTime) -> Self {
        value.utc()
    }
}

impl Add<Duration> for CalDateTime {
    type Output = Self;

    fn add(self, duration: Duration) -> Self::Output {
        Self(self.0 + duration)
    }
}

impl Sub<&CalDateTime> for &CalDateTime {
    type Output = Duration;

    fn sub(self, rhs: &CalDateTime) -> Self::Output {
        self.utc() - rhs.utc()
    }
}
