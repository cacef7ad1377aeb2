use crate::parser::property::{
    GetProperty, IcalACTIONProperty, IcalDURATIONProperty, IcalREPEATProperty,
    IcalTRIGGERProperty,
};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timezones::Timezones;
use chrono::Duration;
use tracing::warn;

/// A VALARM component nested in a VEVENT or VTODO.
#[derive(Debug, Clone, Default)]
pub struct VAlarm {
    pub properties: Vec<ContentLine>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_action(&self, timezones: &Timezones) -> Result<String, ParserError> {
        self.safe_get_required::<IcalACTIONProperty>(timezones)
            .map(|prop| prop.0)
    }

    pub fn get_trigger(
        &self,
        timezones: &Timezones,
    ) -> Result<IcalTRIGGERProperty, ParserError> {
        self.safe_get_required::<IcalTRIGGERProperty>(timezones)
    }

    /// DURATION and REPEAT must be paired: together they describe how often
    /// and how far apart the alarm repeats after the initial trigger. A lone
    /// half of the pair is tolerated with a warning.
    pub fn get_repeat(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<(Duration, u32)>, ParserError> {
        let duration = self
            .safe_get_optional::<IcalDURATIONProperty>(timezones)?
            .map(|prop| prop.0);
        let repeat = self
            .safe_get_optional::<IcalREPEATProperty>(timezones)?
            .map(|prop| prop.0);
        match (duration, repeat) {
            (Some(duration), Some(repeat)) => Ok(Some((duration, repeat))),
            (None, None) => Ok(None),
            _ => {
                warn!("VALARM carries only one of DURATION and REPEAT, ignoring it");
                Ok(None)
            }
        }
    }
}

impl Component for VAlarm {
    const NAMES: &'static [&'static str] = &["VALARM"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VAlarm {
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
