use crate::parser::component::{VEvent, VFreeBusy, VJournal, VTimeZone, VTodo};
use crate::parser::property::{
    GetProperty, IcalCALSCALEProperty, IcalMETHODProperty, IcalPRODIDProperty,
    IcalVERSIONProperty,
};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timeline::Timeline;
use crate::timezones::Timezones;
use crate::types::{CalDateTime, ValueError};
use chrono::NaiveDateTime;

/// A parsed VCALENDAR: the root of the component tree.
///
/// The calendar owns every component and property in its tree, the raw
/// physical lines of the input (for [`Self::get_original_ical_text`]) and
/// the timezone registry built from its VTIMEZONE children.
#[derive(Debug, Clone, Default)]
pub struct VCalendar {
    pub properties: Vec<ContentLine>,
    pub events: Vec<VEvent>,
    pub todos: Vec<VTodo>,
    pub journals: Vec<VJournal>,
    pub free_busys: Vec<VFreeBusy>,
    pub timezones: Vec<VTimeZone>,
    pub extras: Vec<GenericComponent>,
    registry: Timezones,
    source_lines: Vec<String>,
    lines: (usize, usize),
}

impl VCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an iCalendar stream. Fails fast on structural errors; value
    /// errors surface later, when a typed accessor reads the value.
    pub fn parse_text(text: &str) -> Result<VCalendar, ParserError> {
        let mut parser = PropertyParser::from_slice(text.as_bytes());
        let first = parser.next().ok_or(ParserError::MissingHeader)??;
        if first.name != "BEGIN" || !first.value_or_empty().eq_ignore_ascii_case("VCALENDAR") {
            return Err(ParserError::MissingHeader);
        }

        let mut calendar = VCalendar::new();
        calendar.parse("VCALENDAR", first.line, &mut parser)?;
        calendar.source_lines = text.lines().map(ToOwned::to_owned).collect();
        calendar.registry = Timezones::from_components(&calendar.timezones, None);
        Ok(calendar)
    }

    pub fn get_prodid(&self) -> Result<String, ParserError> {
        self.safe_get_required::<IcalPRODIDProperty>(&self.registry)
            .map(|prop| prop.0)
    }

    pub fn get_version(&self) -> Result<String, ParserError> {
        self.safe_get_required::<IcalVERSIONProperty>(&self.registry)
            .map(|prop| prop.0)
    }

    pub fn get_method(&self) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalMETHODProperty>(&self.registry)?
            .map(|prop| prop.0))
    }

    pub fn get_calendar_scale(&self) -> Result<String, ParserError> {
        Ok(self
            .safe_get_optional::<IcalCALSCALEProperty>(&self.registry)?
            .map(|prop| prop.0)
            .unwrap_or_else(|| "GREGORIAN".to_owned()))
    }

    /// The VTIMEZONE component declaring the given TZID, if any.
    pub fn get_timezone(&self, tzid: &str) -> Option<&VTimeZone> {
        self.timezones
            .iter()
            .find(|timezone| timezone.get_tzid().is_ok_and(|id| id == tzid))
    }

    /// The registry resolving TZID references for this calendar.
    pub fn timezone_registry(&self) -> &Timezones {
        &self.registry
    }

    /// Interpret a wall-clock time in the named timezone.
    pub fn localize(
        &self,
        local: NaiveDateTime,
        tzid: &str,
    ) -> Result<CalDateTime, ValueError> {
        self.registry.localize(local, tzid)
    }

    /// Chronological view over 1970-01-01 .. 2100-01-01 (UTC).
    pub fn timeline(&self) -> Timeline<'_> {
        Timeline::new(self)
    }

    /// Chronological view over `[start, end)`.
    pub fn get_limited_timeline(&self, start: CalDateTime, end: CalDateTime) -> Timeline<'_> {
        Timeline::with_range(self, start, end)
    }

    /// The raw input lines between two 1-based inclusive physical line
    /// numbers (the values components report from
    /// [`Component::line_range`]), joined with `\n`.
    pub fn get_original_ical_text(&self, start_line: usize, end_line: usize) -> Option<String> {
        if start_line == 0 || start_line > end_line || start_line > self.source_lines.len() {
            return None;
        }
        let end = end_line.min(self.source_lines.len());
        Some(self.source_lines[start_line - 1..end].join("\n"))
    }
}

impl Component for VCalendar {
    const NAMES: &'static [&'static str] = &["VCALENDAR"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VCalendar {
    fn get_properties_mut(&mut self) -> &mut Vec<ContentLine> {
        &mut self.properties
    }

    fn set_line_range(&mut self, range: (usize, usize)) {
        self.lines = range;
    }

    fn add_sub_component(
        &mut self,
        value: &str,
        begin_line: usize,
        parser: &mut PropertyParser,
    ) -> Result<(), ParserError> {
        match value {
            "VEVENT" => {
                let mut event = VEvent::new();
                event.parse(value, begin_line, parser)?;
                self.events.push(event);
            }
            "VTODO" => {
                let mut todo = VTodo::new();
                todo.parse(value, begin_line, parser)?;
                self.todos.push(todo);
            }
            "VJOURNAL" => {
                let mut journal = VJournal::new();
                journal.parse(value, begin_line, parser)?;
                self.journals.push(journal);
            }
            "VFREEBUSY" => {
                let mut free_busy = VFreeBusy::new();
                free_busy.parse(value, begin_line, parser)?;
                self.free_busys.push(free_busy);
            }
            "VTIMEZONE" => {
                let mut timezone = VTimeZone::new();
                timezone.parse(value, begin_line, parser)?;
                self.timezones.push(timezone);
            }
            _ => self.extras.push(parse_extra(value, begin_line, parser)?),
        }
        Ok(())
    }
}
