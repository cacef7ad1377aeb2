//! Read and unfold logical lines from an iCalendar stream.
//!
//! Content lines are delimited by CRLF, but long lines may be folded onto
//! several physical lines: a CRLF immediately followed by a single space or
//! horizontal tab continues the previous logical line. Unfolding removes the
//! CRLF and the single leading whitespace byte. Multi-octet characters must
//! stay contiguous, so unfolding operates on bytes and UTF-8 validation
//! happens once per logical line.
//!
//! The reader accepts both CRLF and bare LF endings, skips empty lines and
//! does not require a final newline. Each [`Line`] remembers the physical
//! line number it started on, which the component layer records for
//! [`crate::VCalendar::get_original_ical_text`].

use std::borrow::Cow;
use std::fmt;
use std::iter::{Iterator, Peekable};
use std::str::Utf8Error;
use std::string::FromUtf8Error;

/// An unfolded logical line.
///
/// The inner string is the raw unfolded content. No splitting into name,
/// parameters and value has happened yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line<'a> {
    inner: Cow<'a, str>,
    number: usize,
}

impl<'a> Line<'a> {
    pub fn new(line: Cow<'a, str>, number: usize) -> Line<'a> {
        Line { inner: line, number }
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_ref()
    }

    /// 1-based physical line number of the first physical line of this
    /// logical line.
    pub fn number(&self) -> usize {
        self.number
    }
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}: {}", self.number, self.inner)
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LineError {
    #[error(transparent)]
    Utf8Error(#[from] Utf8Error),
    #[error(transparent)]
    FromUtf8Error(#[from] FromUtf8Error),
}

/// Iterator over physical lines of a byte slice.
///
/// `std::io::Lines` is not applicable since a multi-octet sequence might be
/// wrapped over multiple physical lines.
#[derive(Debug)]
struct BytesLines<'a>(&'a [u8]);

impl<'a> Iterator for BytesLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        match self.0.iter().position(|val| val == &b'\n') {
            Some(pos) => {
                let line_end = if pos > 0 && self.0[pos - 1] == b'\r' {
                    pos - 1
                } else {
                    pos
                };
                let line = &self.0[..line_end];
                self.0 = self.0.split_at(pos + 1).1;
                Some(line)
            }
            None if !self.0.is_empty() => {
                // Last line without a trailing newline.
                let line = self.0;
                self.0 = &[];
                Some(line)
            }
            None => None,
        }
    }
}

/// Iterator yielding unfolded [`Line`]s from a byte slice.
pub struct LineReader<'a> {
    lines: Peekable<BytesLines<'a>>,
    number: usize,
}

impl<'a> LineReader<'a> {
    pub fn from_slice(slice: &'a [u8]) -> LineReader<'a> {
        LineReader {
            lines: BytesLines(slice).peekable(),
            number: 0,
        }
    }
}

impl<'a> Iterator for LineReader<'a> {
    type Item = Result<Line<'a>, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (mut unfolded, line_number): (Cow<'a, [u8]>, usize) = loop {
            let line = self.lines.next()?;
            self.number += 1;
            if !line.iter().all(|b| b.is_ascii_whitespace()) {
                break (Cow::Borrowed(line), self.number);
            }
        };

        while let Some(next) = self
            .lines
            .next_if(|line| line.starts_with(b" ") || line.starts_with(b"\t"))
        {
            self.number += 1;
            // Drop the single leading whitespace byte of the continuation.
            unfolded.to_mut().extend_from_slice(&next[1..]);
        }

        let unfolded = match unfolded {
            Cow::Owned(bytes) => Cow::Owned(match String::from_utf8(bytes) {
                Ok(val) => val,
                Err(err) => return Some(Err(err.into())),
            }),
            Cow::Borrowed(slice) => Cow::Borrowed(match str::from_utf8(slice) {
                Ok(val) => val,
                Err(err) => return Some(Err(err.into())),
            }),
        };

        Some(Ok(Line::new(unfolded, line_number)))
    }
}

#[cfg(test)]
mod tests {
    use super::{Line, LineReader};
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("\n", vec![])]
    #[case("SUMMARY:ok", vec![Line{inner: "SUMMARY:ok".into(), number: 1}])]
    #[case("SUMMARY:fol\r\n ded", vec![Line{inner: "SUMMARY:folded".into(), number: 1}])]
    #[case("SUMMARY:fol\n\tded", vec![Line{inner: "SUMMARY:folded".into(), number: 1}])]
    #[case(
        "DESCRIPTION:one \r\n two \r\n three",
        vec![Line{inner: "DESCRIPTION:one two three".into(), number: 1}]
    )]
    #[case(
        "line1\r\n\r\nline2",
        vec![Line{inner: "line1".into(), number: 1}, Line{inner: "line2".into(), number: 3}]
    )]
    #[case("no final newline", vec![Line{inner: "no final newline".into(), number: 1}])]
    fn unfolds(#[case] input: &str, #[case] lines: Vec<Line>) {
        let parsed = LineReader::from_slice(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, lines);
    }

    #[test]
    fn keeps_multi_octet_sequences() {
        let parsed = LineReader::from_slice("SUMMARY:caf\r\n \u{e9}".as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed[0].as_str(), "SUMMARY:caf\u{e9}");
    }
}
