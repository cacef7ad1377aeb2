//! An RFC 5545 iCalendar parser with recurrence expansion and a
//! chronologically ordered timeline.
//!
//! The crate reads an iCalendar stream into a typed [`VCalendar`] tree,
//! expands RRULE/RDATE/EXDATE recurrences (including RECURRENCE-ID
//! overrides) and localises floating times through the calendar's own
//! VTIMEZONE definitions. Structural errors fail at parse time with line
//! numbers; value-level errors surface when a typed accessor reads the
//! value.
//!
//! # Examples
//!
//! ```rust
//! let text = "BEGIN:VCALENDAR\r\n\
//! VERSION:2.0\r\n\
//! PRODID:-//example//EN\r\n\
//! BEGIN:VEVENT\r\n\
//! UID:breakfast\r\n\
//! DTSTAMP:20220101T000000Z\r\n\
//! DTSTART:20220103T090000Z\r\n\
//! DTEND:20220103T093000Z\r\n\
//! RRULE:FREQ=WEEKLY;COUNT=5;BYDAY=MO\r\n\
//! END:VEVENT\r\n\
//! END:VCALENDAR\r\n";
//!
//! let calendar = ical_timeline::parse(text).unwrap();
//! let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();
//! assert_eq!(occurrences.len(), 5);
//! assert_eq!(occurrences[0].timespan.begin.format(), "20220103T090000Z");
//! ```

pub mod line;
pub mod parser;
pub mod property;
pub mod recurrence;
pub mod timeline;
pub mod timezones;
pub mod types;

pub use line::{Line, LineReader};
pub use parser::component::{
    Observance, ObservanceKind, RecurringComponent, VAlarm, VCalendar, VEvent, VFreeBusy,
    VJournal, VTimeZone, VTodo,
};
pub use parser::property::GetProperty;
pub use parser::{Component, ComponentMut, GenericComponent, ParserError};
pub use property::{ContentLine, ContentLineParams, PropertyError, PropertyParser};
pub use recurrence::{RecurRule, RecurrenceInput};
pub use timeline::{CalendarItem, Occurrence, Timeline};
pub use timezones::Timezones;
pub use types::{
    CalDate, CalDateOrDateTime, CalDateTime, CalTimezone, Timespan, ValueError,
};

pub(crate) const PARAM_DELIMITER: char = ';';
pub(crate) const PARAM_NAME_DELIMITER: char = '=';
pub(crate) const PARAM_VALUE_DELIMITER: char = ',';
pub(crate) const PARAM_QUOTE: char = '"';
pub(crate) const VALUE_DELIMITER: char = ':';

/// Parse an iCalendar stream into a [`VCalendar`].
///
/// The input may use CRLF or LF line endings, tolerates trailing
/// whitespace and empty lines, and does not require a final newline. The
/// first content line must be `BEGIN:VCALENDAR`.
pub fn parse(text: &str) -> Result<VCalendar, ParserError> {
    VCalendar::parse_text(text)
}
