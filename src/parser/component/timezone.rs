use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::recurrence::RecurRule;
use crate::types::{CalTimezone, LOCAL_DATE_TIME, parse_utc_offset};
use chrono::{FixedOffset, NaiveDateTime};

/// A VTIMEZONE component: a TZID plus its STANDARD/DAYLIGHT observances.
///
/// The offset/DST transition table derived from the observances is built by
/// [`crate::timezones::Timezones`]; this type only carries the parsed tree.
#[derive(Debug, Clone, Default)]
pub struct VTimeZone {
    pub properties: Vec<ContentLine>,
    pub observances: Vec<Observance>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VTimeZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_tzid(&self) -> Result<&str, ParserError> {
        self.get_property("TZID")
            .and_then(|prop| prop.value.as_deref())
            .ok_or(ParserError::MissingProperty("TZID"))
    }

    /// Common extension naming an IANA zone equivalent to this definition,
    /// mostly emitted by Microsoft products.
    pub fn get_lic_location(&self) -> Option<&str> {
        self.get_property("X-LIC-LOCATION")
            .and_then(|prop| prop.value.as_deref())
    }

    /// IANA zone this definition resolves to without a hand-built table:
    /// via X-LIC-LOCATION first, then by the TZID itself.
    pub fn olson_equivalent(&self) -> Option<CalTimezone> {
        if let Some(location) = self.get_lic_location()
            && let Ok(tz) = location.parse::<chrono_tz::Tz>()
        {
            return Some(CalTimezone::Olson(tz));
        }
        None
    }
}

impl Component for VTimeZone {
    const NAMES: &'static [&'static str] = &["VTIMEZONE"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VTimeZone {
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
            "STANDARD" => {
                let mut observance = Observance::new(ObservanceKind::Standard);
                observance.parse(value, begin_line, parser)?;
                self.observances.push(observance);
            }
            "DAYLIGHT" => {
                let mut observance = Observance::new(ObservanceKind::Daylight);
                observance.parse(value, begin_line, parser)?;
                self.observances.push(observance);
            }
            _ => self.extras.push(parse_extra(value, begin_line, parser)?),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObservanceKind {
    #[default]
    Standard,
    Daylight,
}

/// A STANDARD or DAYLIGHT segment inside a VTIMEZONE.
#[derive(Debug, Clone, Default)]
pub struct Observance {
    pub kind: ObservanceKind,
    pub properties: Vec<ContentLine>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl Observance {
    pub fn new(kind: ObservanceKind) -> Self {
        Observance {
            kind,
            ..Default::default()
        }
    }

    pub fn is_dst(&self) -> bool {
        self.kind == ObservanceKind::Daylight
    }

    /// The observance's wall-clock start. RFC 5545 requires a date with
    /// local time here, interpreted in the frame of TZOFFSETFROM.
    pub fn get_dtstart_local(&self) -> Result<NaiveDateTime, ParserError> {
        let value = self
            .get_property("DTSTART")
            .and_then(|prop| prop.value.as_deref())
            .ok_or(ParserError::MissingProperty("DTSTART"))?;
        NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), LOCAL_DATE_TIME).map_err(|_| {
            crate::types::ValueError::InvalidDatetimeFormat(value.to_owned()).into()
        })
    }

    pub fn get_offset_from(&self) -> Result<FixedOffset, ParserError> {
        self.get_offset("TZOFFSETFROM")
    }

    pub fn get_offset_to(&self) -> Result<FixedOffset, ParserError> {
        self.get_offset("TZOFFSETTO")
    }

    fn get_offset(&self, name: &'static str) -> Result<FixedOffset, ParserError> {
        let value = self
            .get_property(name)
            .and_then(|prop| prop.value.as_deref())
            .ok_or(ParserError::MissingProperty(name))?;
        Ok(parse_utc_offset(value)?)
    }

    pub fn get_rrule(&self) -> Result<Option<RecurRule>, ParserError> {
        let Some(value) = self
            .get_property("RRULE")
            .and_then(|prop| prop.value.as_deref())
        else {
            return Ok(None);
        };
        Ok(Some(value.parse::<RecurRule>()?))
    }

    /// RDATE entries of this observance as wall-clock times. Observance
    /// recurrences carry no TZID, so the values parse as floating times.
    pub fn get_rdate_locals(&self) -> Result<Vec<NaiveDateTime>, ParserError> {
        let mut locals = Vec::new();
        for prop in self.get_named_properties("RDATE") {
            for value in prop.value_or_empty().split(',').filter(|v| !v.is_empty()) {
                let local = NaiveDateTime::parse_from_str(value, LOCAL_DATE_TIME)
                    .map_err(|_| {
                        crate::types::ValueError::InvalidDatetimeFormat(value.to_owned())
                    })?;
                locals.push(local);
            }
        }
        Ok(locals)
    }

    pub fn get_tzname(&self) -> Option<&str> {
        self.get_property("TZNAME")
            .and_then(|prop| prop.value.as_deref())
    }
}

impl Component for Observance {
    const NAMES: &'static [&'static str] = &["STANDARD", "DAYLIGHT"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for Observance {
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
        self.extras.push(parse_extra(value, begin_line, parser)?);
        Ok(())
    }
}
