//! Split unfolded [`Line`]s into content lines.
//!
//! A content line is `name (";" param "=" value ("," value)*)* ":" value`.
//! Property names and parameter keys are case-insensitive and normalised to
//! upper-case here; parameter values and the property value are kept
//! untouched so the typed layer can round-trip raw text exactly.
//!
//! No validity check beyond the grammar is made at this level.

use std::fmt;
use std::iter::Iterator;

use crate::{
    PARAM_DELIMITER, PARAM_NAME_DELIMITER, PARAM_QUOTE, PARAM_VALUE_DELIMITER, VALUE_DELIMITER,
    line::{Line, LineError, LineReader},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error(transparent)]
    Line(#[from] LineError),
    #[error("Line {0}: missing property name.")]
    MissingName(usize),
    #[error("Line {0}: missing a closing quote.")]
    MissingClosingQuote(usize),
    #[error("Line {0}: missing a \"{1}\" delimiter.")]
    MissingDelimiter(usize, char),
    #[error("Line {0}: missing content after \"{1}\".")]
    MissingContentAfter(usize, char),
    #[error("Line {0}: missing a parameter key.")]
    MissingParamKey(usize),
    #[error("Line {0}: missing value.")]
    MissingValue(usize),
}

impl PropertyError {
    /// Physical line number the error was raised on.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            PropertyError::Line(_) => None,
            PropertyError::MissingName(line)
            | PropertyError::MissingClosingQuote(line)
            | PropertyError::MissingDelimiter(line, _)
            | PropertyError::MissingContentAfter(line, _)
            | PropertyError::MissingParamKey(line)
            | PropertyError::MissingValue(line) => Some(*line),
        }
    }
}

/// Parameter list of a content line.
///
/// Keys are upper-cased, values keep their case. Order is document order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, derive_more::From)]
pub struct ContentLineParams(pub Vec<(String, Vec<String>)>);

impl ContentLineParams {
    /// First value of the given parameter, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.iter().map(String::as_str).next())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    pub fn get_tzid(&self) -> Option<&str> {
        self.get("TZID")
    }

    pub fn get_value_type(&self) -> Option<&str> {
        self.get("VALUE")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed content line.
///
/// Content lines are immutable once parsed; typed views are derived from the
/// raw `value` on demand and never mutate it.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ContentLine {
    /// Property name, upper-cased.
    pub name: String,
    /// Property parameters in document order.
    pub params: ContentLineParams,
    /// Raw property value, `None` when the value part was empty.
    pub value: Option<String>,
    /// 1-based physical line number this content line started on.
    pub line: usize,
}

impl ContentLine {
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn get_tzid(&self) -> Option<&str> {
        self.params.get_tzid()
    }

    pub fn get_value_type(&self) -> Option<&str> {
        self.params.get_value_type()
    }

    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Copy of this content line with another value, used to split
    /// comma-separated list values into per-entry lines.
    pub(crate) fn with_value(&self, value: &str) -> ContentLine {
        ContentLine {
            name: self.name.clone(),
            params: self.params.clone(),
            value: Some(value.to_owned()),
            line: self.line,
        }
    }
}

impl fmt::Display for ContentLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "name: {}\nparams: {:?}\nvalue: {:?}",
            self.name, self.params, self.value
        )
    }
}

/// Iterator turning a byte slice into [`ContentLine`]s.
pub struct PropertyParser<'a>(LineReader<'a>);

impl<'a> PropertyParser<'a> {
    pub fn new(line_reader: LineReader<'a>) -> PropertyParser<'a> {
        PropertyParser(line_reader)
    }

    pub fn from_slice(slice: &'a [u8]) -> PropertyParser<'a> {
        PropertyParser(LineReader::from_slice(slice))
    }

    fn parse(&self, line: Line) -> Result<ContentLine, PropertyError> {
        let to_parse = line.as_str().trim_end();

        // Find the end of the property name.
        let Some(end_name_index) = to_parse.find([PARAM_DELIMITER, VALUE_DELIMITER]) else {
            return Err(PropertyError::MissingValue(line.number()));
        };
        let (name, mut to_parse) = to_parse.split_at(end_name_index);
        if name.is_empty() {
            return Err(PropertyError::MissingName(line.number()));
        }

        // The remainder starts with ';' (parameters follow) or ':' (value).
        let mut params = vec![];
        while to_parse.starts_with(PARAM_DELIMITER) {
            to_parse = to_parse.split_at(1).1;

            let Some((key, remainder)) = to_parse.split_once(PARAM_NAME_DELIMITER) else {
                return Err(PropertyError::MissingDelimiter(
                    line.number(),
                    PARAM_NAME_DELIMITER,
                ));
            };
            if key.is_empty() {
                return Err(PropertyError::MissingParamKey(line.number()));
            }
            to_parse = remainder;

            let mut values = Vec::new();
            loop {
                if to_parse.starts_with(PARAM_QUOTE) {
                    // Quoted value, e.g. NAME;FOO="Bar:Baz":value
                    let mut elements = to_parse.splitn(3, PARAM_QUOTE).skip(1);
                    values.push(
                        elements
                            .next()
                            .ok_or_else(|| PropertyError::MissingClosingQuote(line.number()))?
                            .to_string(),
                    );
                    to_parse = elements
                        .next()
                        .ok_or_else(|| PropertyError::MissingClosingQuote(line.number()))?;
                } else {
                    // Raw value, ends at the next ';', ':' or ','.
                    let Some(end_param_value) =
                        to_parse.find([PARAM_DELIMITER, VALUE_DELIMITER, PARAM_VALUE_DELIMITER])
                    else {
                        return Err(PropertyError::MissingContentAfter(
                            line.number(),
                            PARAM_NAME_DELIMITER,
                        ));
                    };
                    let elements = to_parse.split_at(end_param_value);
                    values.push(elements.0.to_string());
                    to_parse = elements.1;
                }

                if !to_parse.starts_with(PARAM_VALUE_DELIMITER) {
                    break;
                }
                to_parse = to_parse.trim_start_matches(PARAM_VALUE_DELIMITER);
            }

            params.push((key.to_uppercase(), values));
        }

        if !to_parse.starts_with(VALUE_DELIMITER) {
            return Err(PropertyError::MissingValue(line.number()));
        }
        to_parse = to_parse.split_at(1).1;

        Ok(ContentLine {
            name: name.to_uppercase(),
            params: params.into(),
            value: (!to_parse.is_empty()).then_some(to_parse.to_string()),
            line: line.number(),
        })
    }
}

impl Iterator for PropertyParser<'_> {
    type Item = Result<ContentLine, PropertyError>;

    fn next(&mut self) -> Option<Result<ContentLine, PropertyError>> {
        Some(match self.0.next()? {
            Ok(line) => self.parse(line),
            Err(err) => Err(err.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentLine, PropertyError, PropertyParser};
    use rstest::rstest;

    fn parse_one(input: &str) -> Result<ContentLine, PropertyError> {
        PropertyParser::from_slice(input.as_bytes()).next().unwrap()
    }

    #[test]
    fn splits_name_params_value() {
        let prop = parse_one("dtstart;tzid=Europe/Berlin:20220327T020000").unwrap();
        assert_eq!(prop.name, "DTSTART");
        assert_eq!(prop.get_tzid(), Some("Europe/Berlin"));
        assert_eq!(prop.value.as_deref(), Some("20220327T020000"));
        assert_eq!(prop.line, 1);
    }

    #[test]
    fn keeps_quoted_parameter_values() {
        let prop = parse_one("ATTENDEE;CN=\"Smith, John\";ROLE=CHAIR:mailto:js@example.com").unwrap();
        assert_eq!(prop.get_param("CN"), Some("Smith, John"));
        assert_eq!(prop.get_param("ROLE"), Some("CHAIR"));
        assert_eq!(prop.value.as_deref(), Some("mailto:js@example.com"));
    }

    #[test]
    fn multi_valued_parameter() {
        let prop = parse_one("X-THING;MEMBER=a,b,c:v").unwrap();
        assert_eq!(prop.params.get_all("MEMBER"), vec!["a", "b", "c"]);
    }

    #[rstest]
    #[case("NOVALUE", PropertyError::MissingValue(1))]
    #[case(":value", PropertyError::MissingName(1))]
    #[case("NAME;:value", PropertyError::MissingDelimiter(1, '='))]
    #[case("NAME;=x:value", PropertyError::MissingParamKey(1))]
    #[case("NAME;KEY=\"unterminated:value", PropertyError::MissingClosingQuote(1))]
    fn grammar_errors(#[case] input: &str, #[case] expected: PropertyError) {
        assert_eq!(parse_one(input).unwrap_err(), expected);
    }

    #[test]
    fn empty_value_is_none() {
        let prop = parse_one("X-EMPTY:").unwrap();
        assert_eq!(prop.value, None);
    }
}
