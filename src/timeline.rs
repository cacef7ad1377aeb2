//! Chronologically ordered view over everything a calendar schedules.
//!
//! The timeline expands every candidate component within its range through
//! the recurrence engine, deduplicates RECURRENCE-ID overrides against
//! their base series, and merges the per-component occurrence lists through
//! a min-heap keyed on the occurrence's begin. With n candidate occurrences
//! of which k are consumed, iteration costs O(n + k log n).

use crate::parser::ParserError;
use crate::parser::component::{
    RecurringComponent, VCalendar, VEvent, VFreeBusy, VJournal, VTodo,
};
use crate::types::{CalDateTime, Timespan};
use chrono::{TimeZone, Utc};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// The component an occurrence was produced from. VTIMEZONE components are
/// never emitted; a VFREEBUSY appears as one non-recurring timespan.
#[derive(Debug, Clone, Copy)]
pub enum CalendarItem<'a> {
    Event(&'a VEvent),
    Todo(&'a VTodo),
    Journal(&'a VJournal),
    FreeBusy(&'a VFreeBusy),
}

/// One concrete occurrence: where it sits on the clock and the component
/// whose properties apply to it. The occurrence borrows the component; all
/// property reads delegate to the original.
#[derive(Debug, Clone)]
pub struct Occurrence<'a> {
    pub timespan: Timespan,
    pub component: CalendarItem<'a>,
}

/// A half-open query window `[start, end)` over one calendar.
///
/// Pick the widest range all queries will need: the expansion happens per
/// range, so reusing one timeline for several `includes`/`overlapping`
/// calls beats re-creating it.
pub struct Timeline<'a> {
    calendar: &'a VCalendar,
    range: Timespan,
}

impl<'a> Timeline<'a> {
    /// The default window, 1970-01-01 to 2100-01-01 (UTC).
    pub(crate) fn new(calendar: &'a VCalendar) -> Self {
        let begin = Utc
            .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
            .single()
            .expect("static date")
            .into();
        let end = Utc
            .with_ymd_and_hms(2100, 1, 1, 0, 0, 0)
            .single()
            .expect("static date")
            .into();
        Self::with_range(calendar, begin, end)
    }

    pub(crate) fn with_range(calendar: &'a VCalendar, start: CalDateTime, end: CalDateTime) -> Self {
        Timeline {
            calendar,
            range: Timespan::new(start, end),
        }
    }

    pub fn range(&self) -> &Timespan {
        &self.range
    }

    /// Group the RECURRENCE-ID starts of override components by UID. The
    /// base series of that UID must not emit an occurrence at those starts;
    /// the override itself is emitted as a normal component.
    fn override_starts(&self) -> Result<HashMap<String, Vec<CalDateTime>>, ParserError> {
        let timezones = self.calendar.timezone_registry();
        let mut overrides: HashMap<String, Vec<CalDateTime>> = HashMap::new();

        fn collect<'c, C: RecurringComponent + 'c>(
            components: impl Iterator<Item = &'c C>,
            timezones: &crate::timezones::Timezones,
            overrides: &mut HashMap<String, Vec<CalDateTime>>,
        ) -> Result<(), ParserError> {
            for component in components {
                if let Some(recurrence_id) = component.get_recurrence_id(timezones)? {
                    overrides
                        .entry(component.get_uid(timezones)?)
                        .or_default()
                        .push(recurrence_id.as_datetime()?);
                }
            }
            Ok(())
        }

        collect(self.calendar.events.iter(), timezones, &mut overrides)?;
        collect(self.calendar.todos.iter(), timezones, &mut overrides)?;
        collect(self.calendar.journals.iter(), timezones, &mut overrides)?;
        Ok(overrides)
    }

    fn expand_component<C: RecurringComponent>(
        &self,
        component: &'a C,
        wrap: fn(&'a C) -> CalendarItem<'a>,
        overrides: &HashMap<String, Vec<CalDateTime>>,
        out: &mut Vec<Occurrence<'a>>,
    ) -> Result<(), ParserError> {
        let timezones = self.calendar.timezone_registry();

        // Pre-filter: skip a component whose whole series cannot reach the
        // range.
        let Some(max_span) = component.max_recurring_timespan(timezones)? else {
            return Ok(());
        };
        if !max_span.intersects(&self.range) {
            return Ok(());
        }

        let empty: Vec<CalDateTime> = Vec::new();
        let excluded =
            if !overrides.is_empty() && component.get_recurrence_id(timezones)?.is_none() {
                overrides
                    .get(&component.get_uid(timezones)?)
                    .unwrap_or(&empty)
            } else {
                &empty
            };

        for timespan in component.expand_in_range(&self.range, excluded, timezones)? {
            out.push(Occurrence {
                timespan,
                component: wrap(component),
            });
        }
        Ok(())
    }

    /// Expand all candidate components into one unordered occurrence list.
    fn explode(&self) -> Result<Vec<Occurrence<'a>>, ParserError> {
        let timezones = self.calendar.timezone_registry();
        let overrides = self.override_starts()?;
        let mut occurrences = Vec::new();

        for event in &self.calendar.events {
            self.expand_component(event, CalendarItem::Event, &overrides, &mut occurrences)?;
        }
        for todo in &self.calendar.todos {
            self.expand_component(todo, CalendarItem::Todo, &overrides, &mut occurrences)?;
        }
        for journal in &self.calendar.journals {
            self.expand_component(journal, CalendarItem::Journal, &overrides, &mut occurrences)?;
        }
        for free_busy in &self.calendar.free_busys {
            if let Some(timespan) = free_busy.get_timespan(timezones)? {
                if timespan.intersects(&self.range) {
                    occurrences.push(Occurrence {
                        timespan,
                        component: CalendarItem::FreeBusy(free_busy),
                    });
                }
            }
        }

        Ok(occurrences)
    }

    /// All occurrences in the window, ordered by non-decreasing begin.
    pub fn iterate(&self) -> Result<TimelineIter<'a>, ParserError> {
        let heap = self.explode()?.into_iter().map(HeapEntry).collect();
        Ok(TimelineIter { heap })
    }

    /// Occurrences lying wholly within `[start, end)`.
    pub fn includes(
        &self,
        start: CalDateTime,
        end: CalDateTime,
    ) -> Result<impl Iterator<Item = Occurrence<'a>>, ParserError> {
        let query = Timespan::new(start, end);
        Ok(self
            .iterate()?
            .filter(move |occurrence| occurrence.timespan.is_included_in(&query)))
    }

    /// Occurrences intersecting `[start, end)`.
    pub fn overlapping(
        &self,
        start: CalDateTime,
        end: CalDateTime,
    ) -> Result<impl Iterator<Item = Occurrence<'a>>, ParserError> {
        let query = Timespan::new(start, end);
        Ok(self
            .iterate()?
            .filter(move |occurrence| occurrence.timespan.intersects(&query)))
    }

    /// Occurrences in progress at the instant.
    pub fn at(
        &self,
        instant: CalDateTime,
    ) -> Result<impl Iterator<Item = Occurrence<'a>>, ParserError> {
        Ok(self
            .iterate()?
            .filter(move |occurrence| occurrence.timespan.includes_instant(&instant)))
    }

    /// Occurrences beginning strictly after the instant.
    pub fn start_after(
        &self,
        instant: CalDateTime,
    ) -> Result<impl Iterator<Item = Occurrence<'a>>, ParserError> {
        Ok(self
            .iterate()?
            .filter(move |occurrence| occurrence.timespan.begin > instant))
    }
}

/// Min-heap entry: reversed timespan order so the earliest begin pops first.
struct HeapEntry<'a>(Occurrence<'a>);

impl PartialEq for HeapEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.timespan == other.0.timespan
    }
}

impl Eq for HeapEntry<'_> {}

impl PartialOrd for HeapEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.timespan.cmp(&self.0.timespan)
    }
}

/// Ordered stream of [`Occurrence`]s popped off the merge heap.
pub struct TimelineIter<'a> {
    heap: BinaryHeap<HeapEntry<'a>>,
}

impl<'a> Iterator for TimelineIter<'a> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop().map(|entry| entry.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}
