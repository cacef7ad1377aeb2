use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::{CalDateTime, CalTimezone, ValueError};
use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

pub(crate) const LOCAL_DATE: &str = "%Y%m%d";

/// A DATE value: a calendar day without a time of day.
///
/// The timezone tag records the TZID context the value appeared in, so that
/// turning the day into an instant (its midnight) lands on the right clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalDate(pub NaiveDate, pub CalTimezone);

impl PartialOrd for CalDate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalDate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering_instant().cmp(&other.ordering_instant())
    }
}

impl CalDate {
    pub fn parse_prop(prop: &ContentLine, timezones: &Timezones) -> Result<Self, ValueError> {
        let value = prop
            .value
            .as_deref()
            .ok_or_else(|| ValueError::InvalidDateFormat("empty property".into()))?;
        let timezone = match prop.get_tzid() {
            Some(tzid) => Some(timezones.resolve(tzid)?),
            None => None,
        };
        Self::parse(value, timezone)
    }

    pub fn parse(value: &str, timezone: Option<CalTimezone>) -> Result<Self, ValueError> {
        let timezone = timezone.unwrap_or(CalTimezone::Floating);
        NaiveDate::parse_from_str(value, LOCAL_DATE)
            .map(|date| Self(date, timezone))
            .map_err(|_| ValueError::InvalidDateFormat(value.to_string()))
    }

    #[must_use]
    pub fn naive_date(&self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn timezone(&self) -> &CalTimezone {
        &self.1
    }

    /// Midnight at the start of this day, in the day's timezone context.
    /// A zone whose DST gap erases that midnight yields
    /// [`ValueError::LocalTimeGap`].
    pub fn as_datetime(&self) -> Result<CalDateTime, ValueError> {
        self.0
            .and_time(NaiveTime::default())
            .and_local_timezone(self.1.clone())
            .earliest()
            .map(CalDateTime::from)
            .ok_or(ValueError::LocalTimeGap)
    }

    /// The UTC instant this day orders by. A midnight erased by a DST gap
    /// is keyed on the offset in effect at that wall time read from the
    /// UTC side, so the ordering stays total.
    pub(crate) fn ordering_instant(&self) -> DateTime<Utc> {
        let midnight = self.0.and_time(NaiveTime::default());
        match midnight.and_local_timezone(self.1.clone()).earliest() {
            Some(datetime) => datetime.to_utc(),
            None => {
                let offset = self.1.offset_from_utc_datetime(&midnight).fix();
                (midnight - offset).and_utc()
            }
        }
    }

    #[must_use]
    pub fn format(&self) -> String {
        self.0.format(LOCAL_DATE).to_string()
    }
}
