use crate::parser::component::{RecurringComponent, VAlarm};
use crate::parser::property::{
    GetProperty, IcalATTENDEEProperty, IcalDTENDProperty, IcalDTSTAMPProperty,
    IcalDURATIONProperty, IcalGEOProperty, IcalORGANIZERProperty, IcalSEQUENCEProperty,
    IcalSTATUSProperty, IcalSUMMARYProperty, IcalTRANSPProperty,
};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timezones::Timezones;
use crate::types::{CalDateOrDateTime, CalDateTime};
use chrono::Duration;

/// A VEVENT component.
///
/// The raw property list is always total; typed views are read through the
/// `get_*` accessors, which also surface a missing required property.
#[derive(Debug, Clone, Default)]
pub struct VEvent {
    pub properties: Vec<ContentLine>,
    pub alarms: Vec<VAlarm>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_dtstamp(&self, timezones: &Timezones) -> Result<CalDateTime, ParserError> {
        self.safe_get_required::<IcalDTSTAMPProperty>(timezones)
            .map(|prop| prop.0)
    }

    pub fn get_summary(&self, timezones: &Timezones) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalSUMMARYProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_status(&self, timezones: &Timezones) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalSTATUSProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_transp(&self, timezones: &Timezones) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalTRANSPProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_sequence(&self, timezones: &Timezones) -> Result<Option<u32>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalSEQUENCEProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_geo(&self, timezones: &Timezones) -> Result<Option<(f64, f64)>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalGEOProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_organizer(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<IcalORGANIZERProperty>, ParserError> {
        self.safe_get_optional::<IcalORGANIZERProperty>(timezones)
    }

    pub fn get_attendees(
        &self,
        timezones: &Timezones,
    ) -> Result<Vec<IcalATTENDEEProperty>, ParserError> {
        self.safe_get_all::<IcalATTENDEEProperty>(timezones)
    }
}

impl Component for VEvent {
    const NAMES: &'static [&'static str] = &["VEVENT"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VEvent {
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
            "VALARM" => {
                let mut alarm = VAlarm::new();
                alarm.parse(value, begin_line, parser)?;
                self.alarms.push(alarm);
            }
            _ => self.extras.push(parse_extra(value, begin_line, parser)?),
        }
        Ok(())
    }
}

impl RecurringComponent for VEvent {
    fn get_ending(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalDTENDProperty>(timezones)?
            .map(|prop| prop.0))
    }

    fn get_explicit_duration(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<Duration>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalDURATIONProperty>(timezones)?
            .map(|prop| prop.0))
    }
}
