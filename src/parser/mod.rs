//! Turn content lines into a typed component tree.
//!
//! Components are framed by `BEGIN:<name>`/`END:<name>` lines. Known
//! component and property names dispatch into typed structures; unknown ones
//! (`X-`/iana extensions) are preserved verbatim, components under an extras
//! bucket and properties in the owning component's property list.
//!
//! Parsing is strict about structure (mismatched or missing END lines fail
//! with the offending line number) and lenient about values: a value is only
//! parsed when a typed accessor reads it.

pub mod component;
pub mod property;

use crate::property::{ContentLine, PropertyError, PropertyParser};
use crate::types::ValueError;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("property error: {0}")]
    Property(#[from] PropertyError),
    #[error("invalid value: {0}")]
    Value(#[from] ValueError),
    #[error("the stream must start with BEGIN:VCALENDAR")]
    MissingHeader,
    #[error("line {line}: BEGIN without a component name")]
    MissingComponentName { line: usize },
    #[error("line {line}: expected END:{expected} but found END:{found}")]
    MismatchedEnd {
        expected: String,
        found: String,
        line: usize,
    },
    #[error("component {name} opened on line {line} is never closed")]
    UnterminatedComponent { name: String, line: usize },
    #[error("missing required property: {0}")]
    MissingProperty(&'static str),
    #[error("property conflict: {0}")]
    PropertyConflict(&'static str),
    #[error("internal invariant violated: tree root is not a VCALENDAR")]
    CalendarParentRelation,
}

/// Known properties that occur at most once per component. When one of
/// these repeats, the later instance replaces the earlier one and a warning
/// is emitted; list-valued properties append in document order.
const SINGLE_VALUED: &[&str] = &[
    "VERSION",
    "PRODID",
    "CALSCALE",
    "METHOD",
    "DTSTAMP",
    "UID",
    "DTSTART",
    "DTEND",
    "DUE",
    "DURATION",
    "RRULE",
    "RECURRENCE-ID",
    "SUMMARY",
    "DESCRIPTION",
    "LOCATION",
    "CLASS",
    "CREATED",
    "LAST-MODIFIED",
    "STATUS",
    "SEQUENCE",
    "PRIORITY",
    "TRANSP",
    "GEO",
    "ORGANIZER",
    "URL",
    "PERCENT-COMPLETE",
    "COMPLETED",
    "ACTION",
    "TRIGGER",
    "REPEAT",
    "TZID",
    "TZOFFSETFROM",
    "TZOFFSETTO",
    "TZURL",
];

pub(crate) fn may_repeat(name: &str) -> bool {
    !SINGLE_VALUED.contains(&name)
}

/// Read access shared by all parsed components.
pub trait Component {
    /// The BEGIN/END names this component parses from.
    const NAMES: &'static [&'static str];

    fn get_properties(&self) -> &[ContentLine];

    /// First and last physical line of this component's BEGIN/END frame,
    /// 1-based and inclusive.
    fn line_range(&self) -> (usize, usize);

    /// Find a property by canonical upper-case name.
    fn get_property<'c>(&'c self, name: &str) -> Option<&'c ContentLine> {
        self.get_properties().iter().find(|prop| prop.name == name)
    }

    fn get_named_properties<'c>(&'c self, name: &str) -> Vec<&'c ContentLine> {
        self.get_properties()
            .iter()
            .filter(|prop| prop.name == name)
            .collect()
    }
}

/// Mutable interface used while a component is being read.
pub trait ComponentMut: Component {
    fn get_properties_mut(&mut self) -> &mut Vec<ContentLine>;

    fn set_line_range(&mut self, range: (usize, usize));

    /// Consume a nested `BEGIN:<value>` frame. Implementations dispatch the
    /// names they know and route everything else to [`parse_extra`].
    fn add_sub_component(
        &mut self,
        value: &str,
        begin_line: usize,
        parser: &mut PropertyParser,
    ) -> Result<(), ParserError>;

    fn add_property(&mut self, prop: ContentLine) {
        if !may_repeat(&prop.name) {
            let properties = self.get_properties_mut();
            if let Some(existing) = properties.iter_mut().find(|other| other.name == prop.name) {
                warn!(
                    property = %prop.name,
                    line = prop.line,
                    "single-valued property repeated, keeping the later instance"
                );
                *existing = prop;
                return;
            }
        }
        self.get_properties_mut().push(prop);
    }

    /// Consume content lines until this component's END line.
    ///
    /// `name` is the value of the BEGIN line that opened the component and
    /// `begin_line` its physical line number.
    fn parse(
        &mut self,
        name: &str,
        begin_line: usize,
        parser: &mut PropertyParser,
    ) -> Result<(), ParserError> {
        loop {
            let Some(line) = parser.next() else {
                return Err(ParserError::UnterminatedComponent {
                    name: name.to_owned(),
                    line: begin_line,
                });
            };
            let line = line?;

            match line.name.as_str() {
                "END" => {
                    let found = line.value_or_empty();
                    if !found.eq_ignore_ascii_case(name) {
                        return Err(ParserError::MismatchedEnd {
                            expected: name.to_owned(),
                            found: found.to_owned(),
                            line: line.line,
                        });
                    }
                    self.set_line_range((begin_line, line.line));
                    return Ok(());
                }
                "BEGIN" => {
                    let value = line.value_or_empty().to_uppercase();
                    if value.is_empty() {
                        return Err(ParserError::MissingComponentName { line: line.line });
                    }
                    self.add_sub_component(&value, line.line, parser)?;
                }
                _ => self.add_property(line),
            }
        }
    }
}

/// An unrecognised (`X-`/iana) component, preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericComponent {
    /// Original name, upper-cased.
    pub name: String,
    pub properties: Vec<ContentLine>,
    pub children: Vec<GenericComponent>,
    lines: (usize, usize),
}

impl GenericComponent {
    pub fn new(name: String) -> Self {
        GenericComponent {
            name,
            ..Default::default()
        }
    }

    /// Extras-bucket key of this component: its name lower-cased with `-`
    /// replaced by `_` (e.g. `X-MY-COMPONENT` -> `x_my_component`).
    pub fn key(&self) -> String {
        self.name.to_lowercase().replace('-', "_")
    }
}

impl Component for GenericComponent {
    const NAMES: &'static [&'static str] = &[];

    fn get_properties(&self) -> &[ContentLine] {
        &self.properties
    }

    fn line_range(&self) -> (usize, usize) {
        self.lines
    }
}

impl ComponentMut for GenericComponent {
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
        let mut child = GenericComponent::new(value.to_owned());
        child.parse(value, begin_line, parser)?;
        self.children.push(child);
        Ok(())
    }
}

/// Parse an unknown nested frame into a [`GenericComponent`].
pub(crate) fn parse_extra(
    value: &str,
    begin_line: usize,
    parser: &mut PropertyParser,
) -> Result<GenericComponent, ParserError> {
    let mut extra = GenericComponent::new(value.to_owned());
    extra.parse(value, begin_line, parser)?;
    Ok(extra)
}
