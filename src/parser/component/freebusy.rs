use crate::parser::property::{
    GetProperty, IcalDTENDProperty, IcalDTSTARTProperty, IcalFREEBUSYProperty,
};
use crate::parser::{Component, ComponentMut, GenericComponent, ParserError, parse_extra};
use crate::property::{ContentLine, PropertyParser};
use crate::timezones::Timezones;
use crate::types::{Period, Timespan};

/// A VFREEBUSY component. It never recurs; the timeline emits it as a
/// single timespan from DTSTART to DTEND when both are present.
#[derive(Debug, Clone, Default)]
pub struct VFreeBusy {
    pub properties: Vec<ContentLine>,
    pub extras: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl VFreeBusy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_timespan(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<Timespan>, ParserError> {
        let Some(start) = self.safe_get_optional::<IcalDTSTARTProperty>(timezones)? else {
            return Ok(None);
        };
        let Some(end) = self.safe_get_optional::<IcalDTENDProperty>(timezones)? else {
            return Ok(None);
        };
        Ok(Some(Timespan::new(
            start.0.as_datetime()?,
            end.0.as_datetime()?,
        )))
    }

    /// The busy periods advertised by FREEBUSY properties.
    pub fn get_periods(&self, timezones: &Timezones) -> Result<Vec<Period>, ParserError> {
        Ok(self
            .safe_get_all::<IcalFREEBUSYProperty>(timezones)?
            .into_iter()
            .flat_map(|prop| prop.0)
            .collect())
    }
}

impl Component for VFreeBusy {
    const NAMES: &'static [&'static str] = &["VFREEBUSY"];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for VFreeBusy {
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
