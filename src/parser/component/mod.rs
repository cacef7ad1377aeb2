mod alarm;
pub use alarm::*;
mod calendar;
pub use calendar::*;
mod event;
pub use event::*;
mod freebusy;
pub use freebusy::*;
mod journal;
pub use journal::*;
mod timezone;
pub use timezone::*;
mod todo;
pub use todo::*;

use crate::parser::property::{
    GetProperty, IcalDTSTARTProperty, IcalEXDATEProperty, IcalRDATEProperty,
    IcalRECURRENCEIDProperty, IcalRRULEProperty, IcalUIDProperty,
};
use crate::parser::{Component, ParserError};
use crate::recurrence::{RecurRule, RecurrenceInput};
use crate::timezones::Timezones;
use crate::types::{CalDateOrDateTime, CalDateTime, DateOrDateTimeOrPeriod, Timespan};
use chrono::Duration;

/// Shared surface of the components that can recur (VEVENT, VTODO,
/// VJOURNAL): DTSTART plus the RRULE/RDATE/EXDATE family, an optional
/// ending and the derived duration.
///
/// All getters take the calendar's [`Timezones`] so TZID references resolve
/// lazily, when the value is read.
pub trait RecurringComponent: Component + Sized {
    /// The property closing the component's base occurrence: DTEND for
    /// events, DUE for to-dos, absent for journals.
    fn get_ending(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError>;

    /// An explicit DURATION property, for the components that allow one.
    fn get_explicit_duration(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<Duration>, ParserError>;

    fn get_uid(&self, timezones: &Timezones) -> Result<String, ParserError> {
        self.safe_get_required::<IcalUIDProperty>(timezones)
            .map(|prop| prop.0)
    }

    fn get_dtstart(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalDTSTARTProperty>(timezones)?
            .map(|prop| prop.0))
    }

    fn get_rrule(&self, timezones: &Timezones) -> Result<Option<RecurRule>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalRRULEProperty>(timezones)?
            .map(|prop| prop.0))
    }

    fn get_rdates(
        &self,
        timezones: &Timezones,
    ) -> Result<Vec<DateOrDateTimeOrPeriod>, ParserError> {
        Ok(self
            .safe_get_all::<IcalRDATEProperty>(timezones)?
            .into_iter()
            .flat_map(|prop| prop.0)
            .collect())
    }

    fn get_exdates(
        &self,
        timezones: &Timezones,
    ) -> Result<Vec<CalDateOrDateTime>, ParserError> {
        Ok(self
            .safe_get_all::<IcalEXDATEProperty>(timezones)?
            .into_iter()
            .flat_map(|prop| prop.0)
            .collect())
    }

    /// RECURRENCE-ID when this component overrides one instance of a
    /// recurring series with the same UID.
    fn get_recurrence_id(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalRECURRENCEIDProperty>(timezones)?
            .map(|prop| prop.0))
    }

    /// Derived duration: ending−start when an ending is present, the
    /// DURATION property otherwise, zero as the last resort. An ending and
    /// an explicit DURATION together are a conflict per RFC 5545.
    fn computed_duration(&self, timezones: &Timezones) -> Result<Duration, ParserError> {
        let ending = self.get_ending(timezones)?;
        let explicit = self.get_explicit_duration(timezones)?;
        if ending.is_some() && explicit.is_some() {
            return Err(ParserError::PropertyConflict(
                "both an ending and a DURATION are defined",
            ));
        }
        if let Some(ending) = ending {
            if let Some(start) = self.get_dtstart(timezones)? {
                return Ok(&ending.as_datetime()? - &start.as_datetime()?);
            }
        }
        Ok(explicit.unwrap_or_else(Duration::zero))
    }

    /// Everything the recurrence engine needs about this component.
    fn recurrence_input(&self, timezones: &Timezones) -> Result<RecurrenceInput, ParserError> {
        Ok(RecurrenceInput {
            start: self.get_dtstart(timezones)?,
            duration: self.computed_duration(timezones)?,
            rrule: self.get_rrule(timezones)?,
            rdates: self.get_rdates(timezones)?,
            exdates: self.get_exdates(timezones)?,
        })
    }

    /// Expand this component's occurrences within `range`; see
    /// [`RecurrenceInput::expand_in_range`].
    fn expand_in_range(
        &self,
        range: &Timespan,
        starts_to_exclude: &[CalDateTime],
        timezones: &Timezones,
    ) -> Result<Vec<Timespan>, ParserError> {
        Ok(self
            .recurrence_input(timezones)?
            .expand_in_range(range, starts_to_exclude)?)
    }

    /// Advisory bound on everything this component can produce, used for
    /// range pre-filtering.
    fn max_recurring_timespan(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<Timespan>, ParserError> {
        Ok(self.recurrence_input(timezones)?.max_recurring_timespan()?)
    }
}
