use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::{
    CalDateOrDateTime, CalDateTime, CalTimezone, ValueError, parse_duration,
};
use chrono::Duration;

/// Second half of a PERIOD value: an explicit end or a duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeOrDuration {
    DateTime(CalDateTime),
    Duration(Duration),
}

impl DateTimeOrDuration {
    pub fn parse(value: &str, timezone: Option<CalTimezone>) -> Result<Self, ValueError> {
        if let Ok(datetime) = CalDateTime::parse(value, timezone) {
            return Ok(Self::DateTime(datetime));
        }
        Ok(Self::Duration(parse_duration(value)?))
    }
}

/// A PERIOD value, `start/end` or `start/duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period(pub CalDateTime, pub DateTimeOrDuration);

impl Period {
    pub fn parse_prop(prop: &ContentLine, timezones: &Timezones) -> Result<Self, ValueError> {
        let value = prop
            .value
            .as_deref()
            .ok_or_else(|| ValueError::InvalidPeriodFormat("empty property".into()))?;
        let timezone = match prop.get_tzid() {
            Some(tzid) => Some(timezones.resolve(tzid)?),
            None => None,
        };
        Self::parse(value, timezone)
    }

    pub fn parse(value: &str, timezone: Option<CalTimezone>) -> Result<Self, ValueError> {
        let (start, end) = value
            .split_once('/')
            .ok_or_else(|| ValueError::InvalidPeriodFormat(value.to_owned()))?;
        let start = CalDateTime::parse(start, timezone.clone())?;
        let end = DateTimeOrDuration::parse(end, timezone)?;
        Ok(Self(start, end))
    }

    pub fn start(&self) -> &CalDateTime {
        &self.0
    }

    pub fn end(&self) -> CalDateTime {
        match &self.1 {
            DateTimeOrDuration::DateTime(end) => end.clone(),
            DateTimeOrDuration::Duration(duration) => self.0.clone() + *duration,
        }
    }

    pub fn duration(&self) -> Duration {
        match &self.1 {
            DateTimeOrDuration::DateTime(end) => end - &self.0,
            DateTimeOrDuration::Duration(duration) => *duration,
        }
    }
}

/// The value space of RDATE: DATE, DATE-TIME or PERIOD entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOrDateTimeOrPeriod {
    DateOrDateTime(CalDateOrDateTime),
    Period(Period),
}

impl DateOrDateTimeOrPeriod {
    pub fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ValueError> {
        match prop.get_value_type().unwrap_or(default_type) {
            "DATE" | "DATE-TIME" => {
                CalDateOrDateTime::parse_prop(prop, timezones, default_type)
                    .map(Self::DateOrDateTime)
            }
            "PERIOD" => Period::parse_prop(prop, timezones).map(Self::Period),
            other => Err(ValueError::InvalidValueType(other.to_owned())),
        }
    }

    pub fn start(&self) -> Result<CalDateTime, ValueError> {
        match self {
            Self::DateOrDateTime(value) => value.as_datetime(),
            Self::Period(period) => Ok(period.start().clone()),
        }
    }

    /// The entry's own duration: a PERIOD carries one, plain entries do not.
    pub fn own_duration(&self) -> Option<Duration> {
        match self {
            Self::DateOrDateTime(_) => None,
            Self::Period(period) => Some(period.duration()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DateTimeOrDuration, Period};
    use chrono::Duration;

    #[test]
    fn explicit_end() {
        let period = Period::parse("19960403T020000Z/19960403T040000Z", None).unwrap();
        assert_eq!(period.duration(), Duration::hours(2));
        assert_eq!(period.end().format(), "19960403T040000Z");
    }

    #[test]
    fn duration_end() {
        let period = Period::parse("19960404T010000Z/PT3H", None).unwrap();
        assert!(matches!(period.1, DateTimeOrDuration::Duration(_)));
        assert_eq!(period.end().format(), "19960404T040000Z");
    }

    #[test]
    fn missing_solidus() {
        assert!(Period::parse("19960404T010000Z", None).is_err());
    }
}
