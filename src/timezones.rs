//! Resolution of TZID references against the calendar's VTIMEZONEs.
//!
//! Every VTIMEZONE is turned into an ordered offset/DST transition table:
//! each STANDARD/DAYLIGHT observance expands its DTSTART (a wall-clock time
//! in the frame of its own TZOFFSETFROM) through its RDATE and RRULE
//! properties up to a horizon, and the union of all expansions, sorted by
//! instant, is the table. Localising a floating time then means finding the
//! last transition whose wall-clock start does not come after it and
//! applying that observance's TZOFFSETTO.
//!
//! A TZID that names no VTIMEZONE in the calendar falls back to the IANA
//! database before an [`ValueError::UnknownTimezone`] is raised.

use crate::parser::ParserError;
use crate::parser::component::{Observance, VTimeZone};
use crate::types::{
    CalDateOrDateTime, CalDateTime, CalTimezone, CustomZone, ValueError, ZoneTransition,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::warn;

/// Observance expansion stops here unless a horizon is given explicitly.
pub fn default_horizon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2100, 1, 1)
        .expect("static date")
        .and_time(Default::default())
}

/// The timezone registry of one calendar, memoising the transition tables
/// for the horizon it was built with.
#[derive(Debug, Clone, Default)]
pub struct Timezones {
    zones: HashMap<String, CalTimezone>,
}

impl Timezones {
    /// Build the registry for a calendar's VTIMEZONE components.
    ///
    /// A definition that cannot be turned into a transition table degrades
    /// to its IANA equivalent when one can be named, with a warning; the
    /// TZID stays unresolvable otherwise and surfaces as
    /// [`ValueError::UnknownTimezone`] on first use.
    pub fn from_components(components: &[VTimeZone], horizon: Option<NaiveDateTime>) -> Self {
        let horizon = horizon.unwrap_or_else(default_horizon);
        let mut zones = HashMap::new();

        for vtimezone in components {
            let Ok(tzid) = vtimezone.get_tzid() else {
                warn!("ignoring a VTIMEZONE without TZID");
                continue;
            };
            let tzid = tzid.to_owned();

            match build_zone(vtimezone, horizon) {
                Ok(zone) => {
                    zones.insert(tzid, CalTimezone::Custom(Arc::new(zone)));
                }
                Err(err) => {
                    let olson = vtimezone
                        .olson_equivalent()
                        .or_else(|| tzid.parse().ok().map(CalTimezone::Olson));
                    match olson {
                        Some(olson) => {
                            warn!(
                                tzid = %tzid,
                                error = %err,
                                "unusable VTIMEZONE definition, using the IANA zone instead"
                            );
                            zones.insert(tzid, olson);
                        }
                        None => {
                            warn!(tzid = %tzid, error = %err, "unusable VTIMEZONE definition");
                        }
                    }
                }
            }
        }

        Timezones { zones }
    }

    pub fn get(&self, tzid: &str) -> Option<&CalTimezone> {
        self.zones.get(tzid)
    }

    /// Resolve a TZID: the calendar's own definition first, the IANA
    /// database second.
    pub fn resolve(&self, tzid: &str) -> Result<CalTimezone, ValueError> {
        if let Some(zone) = self.zones.get(tzid) {
            return Ok(zone.clone());
        }
        tzid.parse::<chrono_tz::Tz>()
            .map(CalTimezone::Olson)
            .map_err(|_| ValueError::UnknownTimezone(tzid.to_owned()))
    }

    /// Interpret a wall-clock time in the named timezone.
    pub fn localize(&self, local: NaiveDateTime, tzid: &str) -> Result<CalDateTime, ValueError> {
        CalDateTime::from_local(local, self.resolve(tzid)?)
    }
}

/// Derive the ordered transition table of one VTIMEZONE.
pub fn build_zone(
    vtimezone: &VTimeZone,
    horizon: NaiveDateTime,
) -> Result<CustomZone, ParserError> {
    let tzid = vtimezone.get_tzid()?.to_owned();
    if vtimezone.observances.is_empty() {
        return Err(ParserError::MissingProperty("STANDARD/DAYLIGHT observance"));
    }

    let mut transitions = Vec::new();
    let mut fallback: Option<(NaiveDateTime, chrono::FixedOffset)> = None;

    for observance in &vtimezone.observances {
        let dtstart = observance.get_dtstart_local()?;
        let offset_from = observance.get_offset_from()?;
        let offset_to = observance.get_offset_to()?;

        for local in observance_starts(observance, dtstart, horizon)? {
            transitions.push(ZoneTransition {
                local,
                utc: local - Duration::seconds(offset_from.local_minus_utc() as i64),
                offset: offset_to,
                name: observance.get_tzname().map(ToOwned::to_owned),
                is_dst: observance.is_dst(),
            });
        }

        // Times before every transition get the earliest observance's
        // TZOFFSETFROM.
        if fallback.is_none_or(|(earliest, _)| dtstart < earliest) {
            fallback = Some((dtstart, offset_from));
        }
    }

    let (_, fallback_offset) = fallback.expect("at least one observance was present");
    Ok(CustomZone::new(tzid, fallback_offset, transitions))
}

/// All wall-clock starts of one observance up to the horizon: its DTSTART,
/// its RDATE entries and its RRULE expansion.
fn observance_starts(
    observance: &Observance,
    dtstart: NaiveDateTime,
    horizon: NaiveDateTime,
) -> Result<BTreeSet<NaiveDateTime>, ParserError> {
    let mut starts = BTreeSet::new();
    starts.insert(dtstart);
    for rdate in observance.get_rdate_locals()? {
        if rdate <= horizon {
            starts.insert(rdate);
        }
    }
    if let Some(rrule) = observance.get_rrule()? {
        let seed: CalDateOrDateTime =
            CalDateTime::from_local(dtstart, CalTimezone::Floating)?.into();
        for wall in rrule.wall_occurrences(&seed, horizon)? {
            starts.insert(wall);
        }
    }
    starts.retain(|start| *start <= horizon);
    Ok(starts)
}
