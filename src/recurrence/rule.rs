//! Typed view of an RRULE value.
//!
//! The value string `FREQ=WEEKLY;COUNT=5;BYDAY=MO` is parsed into the parts
//! this crate reasons about itself (FREQ, INTERVAL, COUNT, UNTIL, BYEASTER);
//! the remaining BY-parts stay untouched and are handed to the `rrule` crate
//! which implements the RFC 5545 §3.3.10 expansion semantics.
//!
//! Iteration happens in wall-clock space: the series start's local wall time
//! is iterated as if it were UTC and the engine re-localises every produced
//! wall time through the series' own timezone. That keeps occurrences at
//! their local time across DST transitions and makes the iterator
//! independent of the system timezone.

use crate::recurrence::easter::easter_occurrences;
use crate::types::{CalDateOrDateTime, CalDateTime, CalTimezone, ValueError};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::str::FromStr;

use crate::types::{LOCAL_DATE, LOCAL_DATE_TIME, UTC_DATE_TIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = ValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "SECONDLY" => Self::Secondly,
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            other => {
                return Err(ValueError::InvalidRule {
                    rule: other.to_owned(),
                    reason: "unknown FREQ".to_owned(),
                });
            }
        })
    }
}

/// UNTIL bound as written: a date, a floating date-time or a UTC date-time.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Until {
    Date(NaiveDate),
    Floating(NaiveDateTime),
    Utc(DateTime<Utc>),
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurRule {
    raw: String,
    freq: Frequency,
    interval: u32,
    count: Option<u32>,
    until: Option<Until>,
    by_easter: Vec<i32>,
}

impl FromStr for RecurRule {
    type Err = ValueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValueError::InvalidRule {
            rule: raw.to_owned(),
            reason: reason.to_owned(),
        };

        let mut freq = None;
        let mut interval = 1u32;
        let mut count = None;
        let mut until = None;
        let mut by_easter = Vec::new();

        for part in raw.split(';').filter(|part| !part.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid("rule part without '='"))?;
            match key.to_uppercase().as_str() {
                "FREQ" => freq = Some(Frequency::from_str(value)?),
                "INTERVAL" => {
                    interval = value.parse().map_err(|_| invalid("INTERVAL is not a positive integer"))?;
                    if interval == 0 {
                        return Err(invalid("INTERVAL must be at least 1"));
                    }
                }
                "COUNT" => {
                    count = Some(value.parse().map_err(|_| invalid("COUNT is not a positive integer"))?);
                }
                "UNTIL" => until = Some(parse_until(value).ok_or_else(|| invalid("UNTIL is neither a DATE nor a DATE-TIME"))?),
                "BYEASTER" => {
                    for entry in value.split(',') {
                        by_easter.push(entry.parse().map_err(|_| invalid("BYEASTER entry is not an integer"))?);
                    }
                }
                // The remaining BY-parts and WKST are validated by the
                // iteration backend.
                _ => {}
            }
        }

        let freq = freq.ok_or_else(|| invalid("missing FREQ"))?;
        if count.is_some() && until.is_some() {
            return Err(invalid("COUNT and UNTIL are mutually exclusive"));
        }

        Ok(RecurRule {
            raw: raw.to_owned(),
            freq,
            interval,
            count,
            until,
            by_easter,
        })
    }
}

fn parse_until(value: &str) -> Option<Until> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, UTC_DATE_TIME) {
        return Some(Until::Utc(datetime.and_utc()));
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, LOCAL_DATE_TIME) {
        return Some(Until::Floating(datetime));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, LOCAL_DATE) {
        return Some(Until::Date(date));
    }
    None
}

impl RecurRule {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn is_bounded(&self) -> bool {
        self.count.is_some() || self.until.is_some()
    }

    /// The UNTIL bound on the series' wall clock, normalised to the type of
    /// the series start: a DATE bound against a date-time start becomes that
    /// day's midnight, a date-time bound against a DATE start keeps only its
    /// day, and a UTC bound on a zoned series is converted to the series'
    /// wall clock.
    fn until_wall(&self, timezone: &CalTimezone, start_is_date: bool) -> Option<NaiveDateTime> {
        let wall = match self.until.as_ref()? {
            Until::Date(date) => date.and_time(Default::default()),
            Until::Floating(datetime) => *datetime,
            Until::Utc(datetime) => {
                if timezone.is_floating() {
                    datetime.naive_utc()
                } else {
                    datetime.with_timezone(timezone).naive_local()
                }
            }
        };
        if start_is_date {
            Some(wall.date().and_time(Default::default()))
        } else {
            Some(wall)
        }
    }

    /// The rule value with the parts this crate interprets itself removed,
    /// ready for the iteration backend.
    fn sanitized(&self) -> String {
        self.raw
            .split(';')
            .filter(|part| {
                let key = part.split('=').next().unwrap_or_default().to_uppercase();
                !part.is_empty() && key != "UNTIL" && key != "BYEASTER"
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// All wall-clock occurrences from `start` (inclusive, when the rule
    /// matches it) up to `range_limit` inclusive. The UNTIL bound, COUNT and
    /// the limit all cap the sequence, so iteration terminates even for
    /// unbounded rules.
    pub fn wall_occurrences(
        &self,
        start: &CalDateOrDateTime,
        range_limit: NaiveDateTime,
    ) -> Result<Vec<NaiveDateTime>, ValueError> {
        let start_dt: CalDateTime = start.as_datetime()?;
        let start_wall = start_dt.naive_local();
        let timezone = start_dt.timezone();

        let mut limit = range_limit;
        if let Some(until) = self.until_wall(&timezone, start.is_date()) {
            limit = limit.min(until);
        }
        if limit < start_wall {
            return Ok(Vec::new());
        }

        if !self.by_easter.is_empty() {
            return Ok(easter_occurrences(
                &self.by_easter,
                self.interval,
                self.count,
                start_wall,
                limit,
                start_wall.time(),
            ));
        }

        let invalid = |reason: String| ValueError::InvalidRule {
            rule: self.raw.clone(),
            reason,
        };
        let unvalidated = self
            .sanitized()
            .parse::<rrule::RRule<rrule::Unvalidated>>()
            .map_err(|err| invalid(err.to_string()))?;
        let dtstart = rrule::Tz::UTC.from_utc_datetime(&start_wall);
        let validated = unvalidated
            .validate(dtstart)
            .map_err(|err| invalid(err.to_string()))?;
        let set = rrule::RRuleSet::new(dtstart).rrule(validated);

        Ok(set
            .into_iter()
            .map(|occurrence| occurrence.naive_utc())
            .take_while(|wall| *wall <= limit)
            .collect())
    }

    /// Advisory upper bound for the end of the last occurrence: exact for
    /// UNTIL and for small COUNTs, the far future otherwise. Never below the
    /// true last occurrence end.
    pub fn max_end(&self, start: &CalDateOrDateTime, duration: Duration) -> CalDateTime {
        // A start whose midnight is erased by a DST gap cannot anchor the
        // estimate; the far future keeps the bound on the safe side.
        let Ok(start_dt) = start.as_datetime() else {
            return CalDateTime::far_future();
        };
        let timezone = start_dt.timezone();

        if self.until.is_some() {
            let wall = self
                .until_wall(&timezone, start.is_date())
                .expect("until is present");
            return CalDateTime::from_local(wall, timezone)
                .ok()
                .and_then(|end| end.checked_add(duration))
                .unwrap_or_else(CalDateTime::far_future);
        }

        if let Some(count) = self.count {
            if count < 1000 {
                let last = match self.wall_occurrences(start, NaiveDateTime::MAX) {
                    Ok(occurrences) => occurrences.into_iter().next_back(),
                    Err(_) => None,
                };
                if let Some(last) = last
                    && let Ok(last) = CalDateTime::from_local(last, timezone)
                {
                    return last
                        .checked_add(duration)
                        .unwrap_or_else(CalDateTime::far_future);
                }
                return start_dt
                    .checked_add(duration)
                    .unwrap_or_else(CalDateTime::far_future);
            }
        }

        CalDateTime::far_future()
    }
}

#[cfg(test)]
mod tests {
    use super::{Frequency, RecurRule};
    use crate::types::{CalDateOrDateTime, CalDateTime};
    use chrono::NaiveDateTime;
    use rstest::rstest;
    use std::str::FromStr;

    fn start(value: &str) -> CalDateOrDateTime {
        CalDateTime::parse(value, None).unwrap().into()
    }

    fn wall(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").unwrap()
    }

    #[test]
    fn parses_parts() {
        let rule = RecurRule::from_str("FREQ=WEEKLY;COUNT=5;BYDAY=MO").unwrap();
        assert_eq!(rule.freq(), Frequency::Weekly);
        assert_eq!(rule.count(), Some(5));
        assert_eq!(rule.interval(), 1);
        assert!(rule.is_bounded());
    }

    #[rstest]
    #[case("COUNT=5")] // missing FREQ
    #[case("FREQ=SOMETIMES")]
    #[case("FREQ=DAILY;COUNT=2;UNTIL=20220101T000000Z")]
    #[case("FREQ=DAILY;INTERVAL=0")]
    #[case("FREQ=DAILY;BYEASTER=x")]
    fn rejects(#[case] raw: &str) {
        assert!(RecurRule::from_str(raw).is_err());
    }

    #[test]
    fn weekly_count() {
        let rule = RecurRule::from_str("FREQ=WEEKLY;COUNT=5;BYDAY=MO").unwrap();
        let occurrences = rule
            .wall_occurrences(&start("20220103T090000Z"), wall("21000101T000000"))
            .unwrap();
        let formatted: Vec<String> = occurrences.iter().map(|dt| dt.to_string()).collect();
        assert_eq!(
            formatted,
            vec![
                "2022-01-03 09:00:00",
                "2022-01-10 09:00:00",
                "2022-01-17 09:00:00",
                "2022-01-24 09:00:00",
                "2022-01-31 09:00:00"
            ]
        );
    }

    #[test]
    fn until_is_inclusive() {
        let rule = RecurRule::from_str("FREQ=DAILY;UNTIL=20220103T090000Z").unwrap();
        let occurrences = rule
            .wall_occurrences(&start("20220101T090000Z"), wall("21000101T000000"))
            .unwrap();
        assert_eq!(occurrences.len(), 3);
    }

    #[test]
    fn range_limit_terminates_unbounded_rules() {
        let rule = RecurRule::from_str("FREQ=DAILY").unwrap();
        let occurrences = rule
            .wall_occurrences(&start("20220101T090000Z"), wall("20220110T000000"))
            .unwrap();
        assert_eq!(occurrences.len(), 9);
    }

    #[test]
    fn max_end_for_until() {
        let rule = RecurRule::from_str("FREQ=DAILY;UNTIL=20220131T090000Z").unwrap();
        let max_end = rule.max_end(&start("20220101T090000Z"), chrono::Duration::hours(1));
        assert_eq!(max_end.format(), "20220131T100000Z");
    }

    #[test]
    fn max_end_for_small_count() {
        let rule = RecurRule::from_str("FREQ=DAILY;COUNT=3").unwrap();
        let max_end = rule.max_end(&start("20220101T090000Z"), chrono::Duration::hours(1));
        assert_eq!(max_end.format(), "20220103T100000Z");
    }

    #[test]
    fn max_end_unbounded_is_far_future() {
        let rule = RecurRule::from_str("FREQ=DAILY").unwrap();
        let max_end = rule.max_end(&start("20220101T090000Z"), chrono::Duration::hours(1));
        assert_eq!(max_end, CalDateTime::far_future());
    }

    #[test]
    fn easter_rule_expands_natively() {
        let rule = RecurRule::from_str("FREQ=YEARLY;BYEASTER=1;COUNT=2").unwrap();
        let occurrences = rule
            .wall_occurrences(&start("20220101T090000Z"), wall("21000101T000000"))
            .unwrap();
        let formatted: Vec<String> = occurrences.iter().map(|dt| dt.to_string()).collect();
        assert_eq!(formatted, vec!["2022-04-18 09:00:00", "2023-04-10 09:00:00"]);
    }
}
