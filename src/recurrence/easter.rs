//! Support for the non-standard BYEASTER rule part.
//!
//! BYEASTER is a dateutil extension to RFC 5545: each entry is a day offset
//! from Easter Sunday of the year. When present it takes over the date
//! generation of its rule; the other BY-parts are not intersected with it.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Easter Sunday of a Gregorian year, via the anonymous computus.
pub(crate) fn easter_sunday(year: i32) -> NaiveDate {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - 2 * k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("computus yields a valid March or April day")
}

fn offset_day(easter: NaiveDate, offset: i32) -> Option<NaiveDate> {
    if offset >= 0 {
        easter.checked_add_days(Days::new(offset as u64))
    } else {
        easter.checked_sub_days(Days::new(offset.unsigned_abs() as u64))
    }
}

/// Wall-clock occurrences of a yearly BYEASTER rule.
///
/// Years advance from `start`'s year in steps of `interval`; every year
/// contributes one candidate per offset, at `start`'s time of day.
/// Candidates before `start` are dropped, iteration stops beyond `limit`
/// and `count` bounds the number of yielded occurrences.
pub(crate) fn easter_occurrences(
    offsets: &[i32],
    interval: u32,
    count: Option<u32>,
    start: NaiveDateTime,
    limit: NaiveDateTime,
    time_of_day: NaiveTime,
) -> Vec<NaiveDateTime> {
    let remaining = count.map(|c| c as usize).unwrap_or(usize::MAX);
    let mut occurrences = Vec::new();
    if offsets.is_empty() || remaining == 0 {
        return occurrences;
    }

    let min_offset = offsets.iter().copied().min().unwrap_or(0);
    let mut year = start.date().year();
    loop {
        let easter = easter_sunday(year);
        let Some(earliest) = offset_day(easter, min_offset) else {
            break;
        };
        if earliest.and_time(time_of_day) > limit {
            // Easter only moves forward with the year, so later years
            // cannot produce candidates at or below the limit either.
            break;
        }

        let mut this_year: Vec<NaiveDateTime> = offsets
            .iter()
            .filter_map(|offset| offset_day(easter, *offset))
            .map(|date| date.and_time(time_of_day))
            .filter(|candidate| *candidate >= start && *candidate <= limit)
            .collect();
        this_year.sort();
        for candidate in this_year {
            occurrences.push(candidate);
            if occurrences.len() == remaining {
                return occurrences;
            }
        }

        year += interval.max(1) as i32;
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::{easter_occurrences, easter_sunday};
    use chrono::{NaiveDate, NaiveTime};
    use rstest::rstest;

    #[rstest]
    #[case(2022, 4, 17)]
    #[case(2023, 4, 9)]
    #[case(2024, 3, 31)]
    #[case(2025, 4, 20)]
    #[case(1961, 4, 2)]
    fn computus(#[case] year: i32, #[case] month: u32, #[case] day: u32) {
        assert_eq!(
            easter_sunday(year),
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        );
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn yearly_offsets() {
        // Easter Monday, three years running.
        let occurrences = easter_occurrences(
            &[1],
            1,
            None,
            at(2022, 1, 1, 9),
            at(2024, 12, 31, 0),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let days: Vec<String> = occurrences.iter().map(|dt| dt.to_string()).collect();
        assert_eq!(
            days,
            vec![
                "2022-04-18 09:00:00",
                "2023-04-10 09:00:00",
                "2024-04-01 09:00:00"
            ]
        );
    }

    #[test]
    fn count_bounds_generation() {
        let occurrences = easter_occurrences(
            &[0],
            1,
            Some(2),
            at(2022, 1, 1, 0),
            at(2100, 1, 1, 0),
            NaiveTime::default(),
        );
        assert_eq!(occurrences.len(), 2);
    }

    #[test]
    fn candidates_before_start_are_dropped() {
        // Good Friday and Easter Monday; the start sits between them.
        let occurrences = easter_occurrences(
            &[-2, 1],
            1,
            None,
            at(2022, 4, 16, 0),
            at(2022, 12, 31, 0),
            NaiveTime::default(),
        );
        let days: Vec<String> = occurrences.iter().map(|dt| dt.to_string()).collect();
        assert_eq!(days, vec!["2022-04-18 00:00:00"]);
    }
}
