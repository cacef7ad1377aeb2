//! Typed views over raw content lines.
//!
//! Every known property gets a thin wrapper type carrying the parsed value
//! and the original parameters. Wrappers are produced on demand by the
//! `safe_get_*` accessors, which is where value-level errors (bad formats,
//! unknown TZIDs, missing required properties) surface.

use crate::parser::{Component, ParserError};
use crate::property::ContentLine;
use crate::recurrence::RecurRule;
use crate::timezones::Timezones;
use crate::types::{
    CalDateOrDateTime, CalDateTime, DateOrDateTimeOrPeriod, Period, ValueError, parse_duration,
};

mod attendee;
pub use attendee::*;
mod dates;
pub use dates::*;
mod geo;
pub use geo::*;
mod periods;
pub use periods::*;
mod trigger;
pub use trigger::*;

/// A property wrapper with a canonical name and a default VALUE type.
pub trait ICalProperty: Sized {
    const NAME: &'static str;
    const DEFAULT_TYPE: &'static str;

    fn parse_prop(prop: &ContentLine, timezones: &Timezones) -> Result<Self, ParserError>;
}

/// Typed accessors over any component's raw property list.
pub trait GetProperty: Component {
    fn safe_get_all<T: ICalProperty>(
        &self,
        timezones: &Timezones,
    ) -> Result<Vec<T>, ParserError> {
        self.get_named_properties(T::NAME)
            .into_iter()
            .map(|prop| ICalProperty::parse_prop(prop, timezones))
            .collect()
    }

    fn safe_get_optional<T: ICalProperty>(
        &self,
        timezones: &Timezones,
    ) -> Result<Option<T>, ParserError> {
        let mut props = self.get_named_properties(T::NAME).into_iter();
        let Some(prop) = props.next() else {
            return Ok(None);
        };
        if props.next().is_some() {
            return Err(ParserError::PropertyConflict(
                "multiple instances of a single-valued property",
            ));
        }
        ICalProperty::parse_prop(prop, timezones).map(Some)
    }

    fn safe_get_required<T: ICalProperty>(
        &self,
        timezones: &Timezones,
    ) -> Result<T, ParserError> {
        self.safe_get_optional(timezones)?
            .ok_or(ParserError::MissingProperty(T::NAME))
    }

    fn has_prop<T: ICalProperty>(&self) -> bool {
        self.get_property(T::NAME).is_some()
    }
}

impl<C: Component> GetProperty for C {}

/// Parsing of an inner value type out of a content line.
pub trait ParseProp: Sized {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ParserError>;
}

impl ParseProp for String {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(prop.value.clone().unwrap_or_default())
    }
}

impl ParseProp for u32 {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        let value = prop.value_or_empty();
        value
            .parse()
            .map_err(|_| ValueError::InvalidIntFormat(value.to_owned()).into())
    }
}

impl ParseProp for chrono::Duration {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(parse_duration(prop.value_or_empty())?)
    }
}

impl ParseProp for CalDateTime {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(CalDateTime::parse_prop(prop, timezones)?)
    }
}

impl ParseProp for CalDateOrDateTime {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(CalDateOrDateTime::parse_prop(prop, timezones, default_type)?)
    }
}

impl ParseProp for DateOrDateTimeOrPeriod {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(DateOrDateTimeOrPeriod::parse_prop(prop, timezones, default_type)?)
    }
}

impl ParseProp for Period {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(Period::parse_prop(prop, timezones)?)
    }
}

impl ParseProp for RecurRule {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(prop.value_or_empty().parse()?)
    }
}

/// Comma-separated list values parse entry-wise, each entry seeing the same
/// name and parameters.
impl<T: ParseProp> ParseProp for Vec<T> {
    fn parse_prop(
        prop: &ContentLine,
        timezones: &Timezones,
        default_type: &str,
    ) -> Result<Self, ParserError> {
        prop.value_or_empty()
            .trim_end_matches(',')
            .split(',')
            .filter(|value| !value.is_empty())
            .map(|value| T::parse_prop(&prop.with_value(value), timezones, default_type))
            .collect()
    }
}

macro_rules! property {
    ($name:literal, $default_type:literal, $prop:ident, $inner:ty) => {
        #[derive(Debug, Clone, PartialEq, derive_more::From)]
        pub struct $prop(pub $inner, pub crate::property::ContentLineParams);

        impl crate::parser::property::ICalProperty for $prop {
            const NAME: &'static str = $name;
            const DEFAULT_TYPE: &'static str = $default_type;

            fn parse_prop(
                prop: &crate::property::ContentLine,
                timezones: &crate::timezones::Timezones,
            ) -> Result<Self, crate::parser::ParserError> {
                Ok(Self(
                    crate::parser::property::ParseProp::parse_prop(prop, timezones, $default_type)?,
                    prop.params.clone(),
                ))
            }
        }
    };
}
pub(crate) use property;

// Calendar-level properties.
property!("VERSION", "TEXT", IcalVERSIONProperty, String);
property!("PRODID", "TEXT", IcalPRODIDProperty, String);
property!("CALSCALE", "TEXT", IcalCALSCALEProperty, String);
property!("METHOD", "TEXT", IcalMETHODProperty, String);

// Descriptive text properties.
property!("UID", "TEXT", IcalUIDProperty, String);
property!("SUMMARY", "TEXT", IcalSUMMARYProperty, String);
property!("DESCRIPTION", "TEXT", IcalDESCRIPTIONProperty, String);
property!("LOCATION", "TEXT", IcalLOCATIONProperty, String);
property!("CLASS", "TEXT", IcalCLASSProperty, String);
property!("STATUS", "TEXT", IcalSTATUSProperty, String);
property!("TRANSP", "TEXT", IcalTRANSPProperty, String);
property!("URL", "TEXT", IcalURLProperty, String);
property!("COMMENT", "TEXT", IcalCOMMENTProperty, String);
property!("CONTACT", "TEXT", IcalCONTACTProperty, String);
property!("RELATED-TO", "TEXT", IcalRELATEDTOProperty, String);
property!("ATTACH", "TEXT", IcalATTACHProperty, String);
property!("ACTION", "TEXT", IcalACTIONProperty, String);
property!("REQUEST-STATUS", "TEXT", IcalREQUESTSTATUSProperty, String);
property!("CATEGORIES", "TEXT", IcalCATEGORIESProperty, Vec<String>);
property!("RESOURCES", "TEXT", IcalRESOURCESProperty, Vec<String>);
property!("TZID", "TEXT", IcalTZIDProperty, String);
property!("TZNAME", "TEXT", IcalTZNAMEProperty, String);
property!("TZURL", "URI", IcalTZURLProperty, String);

// Integer properties.
property!("SEQUENCE", "INTEGER", IcalSEQUENCEProperty, u32);
property!("PRIORITY", "INTEGER", IcalPRIORITYProperty, u32);
property!("REPEAT", "INTEGER", IcalREPEATProperty, u32);
property!("PERCENT-COMPLETE", "INTEGER", IcalPERCENTCOMPLETEProperty, u32);
