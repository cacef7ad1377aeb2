//! Expansion of recurring components into occurrence timespans.
//!
//! The engine reconciles the base occurrence, RDATE entries, the RRULE
//! sequence and the EXDATE exclusions of one component. Priorities: an
//! override start (passed in by the timeline) and EXDATE suppress
//! everything; an RDATE entry wins over an RRULE occurrence at the same
//! start; every start is emitted at most once.

mod easter;
mod rule;
pub use rule::*;

use crate::types::{
    CalDateOrDateTime, CalDateTime, DateOrDateTimeOrPeriod, Timespan, ValueError,
};
use chrono::Duration;
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::warn;

/// Everything the engine needs to know about one component.
///
/// Components assemble this from their typed getters; the engine itself
/// never looks at raw properties.
#[derive(Debug, Clone)]
pub struct RecurrenceInput {
    pub start: Option<CalDateOrDateTime>,
    /// Derived duration: DTEND−DTSTART when DTEND (or DUE) is present, the
    /// DURATION property otherwise, zero as the last resort.
    pub duration: Duration,
    pub rrule: Option<RecurRule>,
    pub rdates: Vec<DateOrDateTimeOrPeriod>,
    pub exdates: Vec<CalDateOrDateTime>,
}

impl RecurrenceInput {
    fn base_span(&self, start: &CalDateTime) -> Timespan {
        Timespan::new(start.clone(), start.clone() + self.duration)
    }

    /// Advisory upper bound on the end of the last occurrence this
    /// component can produce. Used by the timeline to skip components whose
    /// whole series lies outside the query range; it is never below the
    /// true bound.
    pub fn max_recurring_timespan(&self) -> Result<Option<Timespan>, ValueError> {
        let Some(start) = self.start.as_ref() else {
            return Ok(None);
        };
        let start_dt = start.as_datetime()?;
        if self.rrule.is_none() && self.rdates.is_empty() {
            return Ok(Some(self.base_span(&start_dt)));
        }

        let mut max_end = start_dt.clone() + self.duration;
        for rdate in &self.rdates {
            let rdate_end = rdate.start()? + rdate.own_duration().unwrap_or(self.duration);
            max_end = max_end.max(rdate_end);
        }
        if let Some(rrule) = &self.rrule {
            max_end = max_end.max(rrule.max_end(start, self.duration));
        }
        Ok(Some(Timespan::new(start_dt, max_end)))
    }

    /// Expand this component within `range`, never emitting a start that is
    /// in `starts_to_exclude` (the timeline passes the RECURRENCE-ID starts
    /// of override components here). Returned timespans all intersect
    /// `range` and are sorted ascending.
    pub fn expand_in_range(
        &self,
        range: &Timespan,
        starts_to_exclude: &[CalDateTime],
    ) -> Result<Vec<Timespan>, ValueError> {
        let Some(start) = self.start.as_ref() else {
            return Ok(Vec::new());
        };
        let base_start = start.as_datetime()?;

        // EXDATE entries and override starts dominate every source.
        let mut excluded: BTreeSet<CalDateTime> = starts_to_exclude.iter().cloned().collect();
        for exdate in &self.exdates {
            excluded.insert(exdate.as_datetime()?);
        }

        // Starts already emitted, to guarantee at-most-once per start.
        let mut emitted: BTreeSet<CalDateTime> = BTreeSet::new();
        let mut occurrences: Vec<Timespan> = Vec::new();

        let base = self.base_span(&base_start);
        emitted.insert(base_start.clone());
        if base.intersects(range) && !excluded.contains(&base_start) {
            occurrences.push(base);
        }

        // RDATE entries carry their own duration when they are PERIODs.
        for rdate in &self.rdates {
            let rdate_start = rdate.start()?;
            let span = Timespan::new(
                rdate_start.clone(),
                rdate_start.clone() + rdate.own_duration().unwrap_or(self.duration),
            );
            if !span.intersects(range)
                || excluded.contains(&rdate_start)
                || emitted.contains(&rdate_start)
            {
                continue;
            }
            emitted.insert(rdate_start);
            occurrences.push(span);
        }

        if let Some(rrule) = &self.rrule {
            let timezone = base_start.timezone();
            let wall_limit = range.end.utc().with_timezone(&timezone).naive_local();
            for wall in rrule.wall_occurrences(start, wall_limit)? {
                let Ok(at) = CalDateTime::from_local(wall, timezone.clone()) else {
                    warn!(wall = %wall, "skipping occurrence in a local-time gap");
                    continue;
                };
                let span = Timespan::new(at.clone(), at.clone() + self.duration);
                if !span.intersects(range)
                    || excluded.contains(&at)
                    || emitted.contains(&at)
                {
                    continue;
                }
                emitted.insert(at);
                occurrences.push(span);
            }
        }

        Ok(occurrences.into_iter().sorted().collect())
    }
}
