use crate::parser::component::RecurringComponent;
use crate::parser::property::{GetProperty, IcalDESCRIPTIONProperty, IcalSUMMARYProperty};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timezones::Timezones;
use crate::types::CalDateOrDateTime;
use chrono::Duration;

/// A VJOURNAL component. Journal entries have no ending and no duration;
/// every occurrence is the instant of its start.
#[derive(Debug, Clone, Default)]
pub struct VJournal {
    pub properties: Vec<ContentLine>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self, timezones: &Timezones) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalSUMMARYProperty>(timezones)?
            .map(|prop| prop.0))
    }

    pub fn get_description(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<String>, ParserError> {
        Ok(self
            .safe_get_optional::<IcalDESCRIPTIONProperty>(timezones)?
            .map(|prop| prop.0))
    }
}

impl Component for VJournal {
    const NAMES: &'static [&'static str] = &["VJOURNAL"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VJournal {
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

impl RecurringComponent for VJournal {
    fn get_ending(
        &self,
        _timezones: &Timezones,
    ) -> Result<Option<CalDateOrDateTime>, ParserError> {
        Ok(None)
    }

    fn get_explicit_duration(
        &self,
        _timezones: &Timezones,
    ) -> Result<Option<Duration>, ParserError> {
        Ok(None)
    }
}
