use super::property;
use crate::parser::ParserError;
use crate::property::{ContentLine, ContentLineParams};
use crate::timezones::Timezones;

/// A CAL-ADDRESS value with its describing parameters (CN, CUTYPE, MEMBER,
/// ROLE, PARTSTAT), as used by ORGANIZER and ATTENDEE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalAddress {
    /// The raw URI, usually a `mailto:` address.
    pub uri: String,
    params: ContentLineParams,
}

impl CalAddress {
    /// The address part of a `mailto:` URI.
    pub fn email(&self) -> Option<&str> {
        self.uri.strip_prefix("mailto:")
    }

    pub fn common_name(&self) -> Option<&str> {
        self.params.get("CN")
    }

    pub fn user_type(&self) -> &str {
        self.params.get("CUTYPE").unwrap_or("INDIVIDUAL")
    }

    pub fn member(&self) -> Option<&str> {
        self.params.get("MEMBER")
    }

    pub fn role(&self) -> &str {
        self.params.get("ROLE").unwrap_or("REQ-PARTICIPANT")
    }

    pub fn participation_status(&self) -> &str {
        self.params.get("PARTSTAT").unwrap_or("NEEDS-ACTION")
    }
}

impl super::ParseProp for CalAddress {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        Ok(CalAddress {
            uri: prop.value.clone().unwrap_or_default(),
            params: prop.params.clone(),
        })
    }
}

property!("ORGANIZER", "CAL-ADDRESS", IcalORGANIZERProperty, CalAddress);
property!("ATTENDEE", "CAL-ADDRESS", IcalATTENDEEProperty, CalAddress);
