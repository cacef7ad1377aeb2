//! Timezone designators attached to parsed date-time values.
//!
//! A value is either *floating* (no designator), bound to an Olson zone, or
//! bound to a transition table built from a VTIMEZONE definition in the same
//! calendar. All three are unified behind one [`chrono::TimeZone`]
//! implementation so the rest of the crate can work with plain
//! `DateTime<CalTimezone>` values.

use std::fmt;
use std::sync::Arc;

use chrono::{FixedOffset, MappedLocalTime, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// One entry of a [`CustomZone`] transition table.
///
/// `local` is the observance's wall-clock start (in the frame of its
/// TZOFFSETFROM), `utc` the same instant on the UTC clock and `offset` the
/// TZOFFSETTO that applies from this transition on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTransition {
    pub utc: NaiveDateTime,
    pub local: NaiveDateTime,
    pub offset: FixedOffset,
    pub name: Option<String>,
    pub is_dst: bool,
}

/// Offset/DST table derived from the STANDARD and DAYLIGHT observances of a
/// VTIMEZONE component, ordered by instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomZone {
    tzid: String,
    /// Offset in effect before the first transition (the earliest
    /// observance's TZOFFSETFROM).
    fallback: FixedOffset,
    /// Sorted by `utc` ascending.
    transitions: Vec<ZoneTransition>,
}

impl CustomZone {
    pub fn new(tzid: String, fallback: FixedOffset, mut transitions: Vec<ZoneTransition>) -> Self {
        transitions.sort_by_key(|transition| transition.utc);
        transitions.dedup_by_key(|transition| transition.utc);
        CustomZone {
            tzid,
            fallback,
            transitions,
        }
    }

    pub fn tzid(&self) -> &str {
        &self.tzid
    }

    pub fn transitions(&self) -> &[ZoneTransition] {
        &self.transitions
    }

    /// Offset in effect for a wall-clock time: the TZOFFSETTO of the last
    /// transition whose own wall-clock start does not come after `local`.
    pub fn offset_at_local(&self, local: NaiveDateTime) -> FixedOffset {
        let idx = self
            .transitions
            .partition_point(|transition| transition.local <= local);
        if idx == 0 {
            self.fallback
        } else {
            self.transitions[idx - 1].offset
        }
    }

    /// Offset in effect at a UTC instant.
    pub fn offset_at_utc(&self, utc: NaiveDateTime) -> FixedOffset {
        let idx = self
            .transitions
            .partition_point(|transition| transition.utc <= utc);
        if idx == 0 {
            self.fallback
        } else {
            self.transitions[idx - 1].offset
        }
    }
}

/// Timezone designator of a parsed value.
#[derive(Debug, Clone)]
pub enum CalTimezone {
    /// Wall-clock time without any designator. Floating times order and
    /// subtract as if they were UTC.
    Floating,
    /// An IANA timezone, either referenced directly by TZID or resolved via
    /// X-LIC-LOCATION.
    Olson(Tz),
    /// A transition table built from a VTIMEZONE in the same calendar.
    Custom(Arc<CustomZone>),
}

impl CalTimezone {
    pub fn utc() -> Self {
        Self::Olson(chrono_tz::UTC)
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Olson(chrono_tz::UTC))
    }

    /// The TZID-ish name of this timezone, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Floating => None,
            Self::Olson(tz) => Some(tz.name()),
            Self::Custom(zone) => Some(zone.tzid()),
        }
    }
}

impl PartialEq for CalTimezone {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Floating, Self::Floating) => true,
            (Self::Olson(a), Self::Olson(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.tzid() == b.tzid(),
            _ => false,
        }
    }
}

impl Eq for CalTimezone {}

impl From<Tz> for CalTimezone {
    fn from(value: Tz) -> Self {
        Self::Olson(value)
    }
}

#[derive(Debug, Clone)]
pub enum CalTimezoneOffset {
    Floating,
    Olson(<Tz as TimeZone>::Offset),
    Custom {
        offset: FixedOffset,
        zone: Arc<CustomZone>,
    },
}

impl Offset for CalTimezoneOffset {
    fn fix(&self) -> FixedOffset {
        match self {
            Self::Floating => Utc.fix(),
            Self::Olson(olson) => olson.fix(),
            Self::Custom { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for CalTimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Floating => write!(f, ""),
            Self::Olson(olson) => olson.fmt(f),
            Self::Custom { offset, .. } => offset.fmt(f),
        }
    }
}

impl TimeZone for CalTimezone {
    type Offset = CalTimezoneOffset;

    fn from_offset(offset: &Self::Offset) -> Self {
        match offset {
            CalTimezoneOffset::Floating => Self::Floating,
            CalTimezoneOffset::Olson(offset) => Self::Olson(Tz::from_offset(offset)),
            CalTimezoneOffset::Custom { zone, .. } => Self::Custom(zone.clone()),
        }
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<Self::Offset> {
        match self {
            Self::Floating => MappedLocalTime::Single(CalTimezoneOffset::Floating),
            Self::Olson(tz) => tz
                .offset_from_local_date(local)
                .map(CalTimezoneOffset::Olson),
            Self::Custom(zone) => {
                let midnight = local.and_time(Default::default());
                MappedLocalTime::Single(CalTimezoneOffset::Custom {
                    offset: zone.offset_at_local(midnight),
                    zone: zone.clone(),
                })
            }
        }
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> MappedLocalTime<Self::Offset> {
        match self {
            Self::Floating => MappedLocalTime::Single(CalTimezoneOffset::Floating),
            Self::Olson(tz) => tz
                .offset_from_local_datetime(local)
                .map(CalTimezoneOffset::Olson),
            // The table lookup mechanically applies the TZOFFSETTO of the
            // last observance whose wall-clock start precedes `local`, so
            // gap and fold times resolve to exactly one offset.
            Self::Custom(zone) => MappedLocalTime::Single(CalTimezoneOffset::Custom {
                offset: zone.offset_at_local(*local),
                zone: zone.clone(),
            }),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> Self::Offset {
        match self {
            Self::Floating => CalTimezoneOffset::Floating,
            Self::Olson(tz) => CalTimezoneOffset::Olson(tz.offset_from_utc_date(utc)),
            Self::Custom(zone) => CalTimezoneOffset::Custom {
                offset: zone.offset_at_utc(utc.and_time(Default::default())),
                zone: zone.clone(),
            },
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> Self::Offset {
        match self {
            Self::Floating => CalTimezoneOffset::Floating,
            Self::Olson(tz) => CalTimezoneOffset::Olson(tz.offset_from_utc_datetime(utc)),
            Self::Custom(zone) => CalTimezoneOffset::Custom {
                offset: zone.offset_at_utc(*utc),
                zone: zone.clone(),
            },
        }
    }
}

/// Parse a TZOFFSETFROM/TZOFFSETTO value, `±HHMM` with optional seconds,
/// into a fixed offset.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, crate::types::ValueError> {
    let invalid = || crate::types::ValueError::InvalidOffsetFormat(value.to_owned());

    let (sign, digits) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    if !(digits.len() == 4 || digits.len() == 6) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[0..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..4].parse().map_err(|_| invalid())?;
    let seconds: i32 = if digits.len() == 6 {
        digits[4..6].parse().map_err(|_| invalid())?
    } else {
        0
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (seconds + 60 * (minutes + 60 * hours))).ok_or_else(invalid)
}
