use crate::parser::component::{RecurringComponent, VAlarm};
use crate::parser::property::{
    GetProperty, IcalCOMPLETEDProperty, IcalDUEProperty, IcalDURATIONProperty,
    IcalPERCENTCOMPLETEProperty, IcalSUMMARYProperty,
};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timezones::Timezones;
use crate::types::{CalDateOrDateTime, CalDateTime};
use chrono::Duration;

/// A VTODO component. Its base occurrence closes at DUE, the to-do
/// counterpart of DTEND.
#[derive(Debug, Clone, Default)]
pub struct VTodo {
    pub properties: Vec<ContentLine>,
    pub alarms: Vec<VAlarm>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VTodo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self, timezones: &Timezones) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalSUMMARYProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_completed(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateTime>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalCOMPLETEDProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_percent_complete(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<u32>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalPERCENTCOMPLETEProperty>(timezones)?
            .map(|prop| prop.0))
    }
}

impl Component for VTodo {
    const NAMES: &'static [&'static str] = &["VTODO"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VTodo {
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

impl RecurringComponent for VTodo {
    fn get_ending(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalDUEProperty>(timezones)?
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
