use super::property;
use crate::parser::ParserError;
use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::{CalDateTime, parse_duration};

/// A TRIGGER value: a duration relative to the component, or an absolute
/// date-time, as selected by the VALUE parameter (default DURATION).
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Duration(chrono::Duration),
    DateTime(CalDateTime),
}

/// What a relative trigger is anchored to, from the RELATED parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerRelation {
    #[default]
    Start,
    End,
}

impl super::ParseProp for Trigger {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ParserError> {
        match prop.get_value_type().unwrap_or(default_type) {
            "DATE-TIME" => Ok(Trigger::DateTime(CalDateTime::parse_prop(prop, timezones)?)),
            _ => Ok(Trigger::Duration(parse_duration(prop.value_or_empty())?)),
        }
    }
}

property!("TRIGGER", "DURATION", IcalTRIGGERProperty, Trigger);

impl IcalTRIGGERProperty {
    pub fn related(&self) -> TriggerRelation {
        match self.1.get("RELATED") {
            Some("END") => TriggerRelation::End,
            _ => TriggerRelation::Start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IcalTRIGGERProperty, Trigger, TriggerRelation};
    use crate::parser::property::ICalProperty;
    use crate::property::PropertyParser;
    use crate::timezones::Timezones;

    fn parse(input: &str) -> IcalTRIGGERProperty {
        let content_line = PropertyParser::from_slice(input.as_bytes())
            .next()
            .unwrap()
            .unwrap();
        IcalTRIGGERProperty::parse_prop(&content_line, &Timezones::default()).unwrap()
    }

    #[test]
    fn duration_trigger_is_the_default() {
        let trigger = parse("TRIGGER:-PT15M");
        assert_eq!(trigger.0, Trigger::Duration(-chrono::Duration::minutes(15)));
        assert_eq!(trigger.related(), TriggerRelation::Start);
    }

    #[test]
    fn absolute_trigger() {
        let trigger = parse("TRIGGER;VALUE=DATE-TIME:19970317T133000Z");
        assert!(matches!(trigger.0, Trigger::DateTime(_)));
    }

    #[test]
    fn related_to_end() {
        let trigger = parse("TRIGGER;RELATED=END:PT5M");
        assert_eq!(trigger.related(), TriggerRelation::End);
    }
}
