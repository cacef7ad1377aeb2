use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::{CalDate, CalDateTime, CalTimezone, ValueError};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A value that is either a DATE or a DATE-TIME, as selected by the VALUE
/// parameter (with a per-property default).
///
/// Ordering is chronological: values compare by their instant (a DATE by
/// its midnight), with an all-day value sorting before a timed value at
/// the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalDateOrDateTime {
    DateTime(CalDateTime),
    Date(CalDate),
}

impl PartialOrd for CalDateOrDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalDateOrDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordering_instant()
            .cmp(&other.ordering_instant())
            .then_with(|| self.variant_rank().cmp(&other.variant_rank()))
    }
}

impl CalDateOrDateTime {
    pub fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ValueError> {
        match prop.get_value_type().unwrap_or(default_type) {
            "DATE" => Ok(Self::Date(CalDate::parse_prop(prop, timezones)?)),
            "DATE-TIME" => Ok(Self::DateTime(CalDateTime::parse_prop(prop, timezones)?)),
            other => Err(ValueError::InvalidValueType(other.to_owned())),
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    pub fn timezone(&self) -> CalTimezone {
        match self {
            Self::DateTime(datetime) => datetime.timezone(),
            Self::Date(date) => date.timezone().clone(),
        }
    }

    pub fn utc(&self) -> Result<DateTime<Utc>, ValueError> {
        Ok(self.as_datetime()?.utc())
    }

    /// The value as an instant; a DATE maps to its midnight. A midnight
    /// erased by a DST gap yields [`ValueError::LocalTimeGap`].
    pub fn as_datetime(&self) -> Result<CalDateTime, ValueError> {
        match self {
            Self::DateTime(datetime) => Ok(datetime.clone()),
            Self::Date(date) => date.as_datetime(),
        }
    }

    pub fn format(&self) -> String {
        match self {
            Self::DateTime(datetime) => datetime.format(),
            Self::Date(date) => date.format(),
        }
    }

    fn ordering_instant(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(datetime) => datetime.utc(),
            Self::Date(date) => date.ordering_instant(),
        }
    }

    fn variant_rank(&self) -> u8 {
        match self {
            Self::Date(_) => 0,
            Self::DateTime(_) => 1,
        }
    }
}

impl From<CalDateTime> for CalDateOrDateTime {
    fn from(value: CalDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<CalDate> for CalDateOrDateTime {
    fn from(value: CalDate) -> Self {
        Self::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::CalDateOrDateTime;
    use crate::types::{CalDate, CalDateTime};

    fn datetime(value: &str) -> CalDateOrDateTime {
        CalDateTime::parse(value, None).unwrap().into()
    }

    fn date(value: &str) -> CalDateOrDateTime {
        CalDate::parse(value, None).unwrap().into()
    }

    #[test]
    fn orders_chronologically_across_variants() {
        // A far-future date-time sorts after a past date, and the other
        // way around.
        assert!(datetime("22991231T000000Z") > date("20200101"));
        assert!(date("22991231") > datetime("20200101T120000Z"));
    }

    #[test]
    fn date_sorts_before_a_timed_value_at_its_midnight() {
        assert!(date("20220601") < datetime("20220601T000000Z"));
        assert!(date("20220601") < datetime("20220601T090000Z"));
        assert!(datetime("20220531T235959Z") < date("20220601"));
    }

    #[test]
    fn equal_values_compare_equal() {
        assert_eq!(
            date("20220601").cmp(&date("20220601")),
            std::cmp::Ordering::Equal
        );
        assert_eq!(
            datetime("20220601T090000Z").cmp(&datetime("20220601T090000Z")),
            std::cmp::Ordering::Equal
        );
    }
}
