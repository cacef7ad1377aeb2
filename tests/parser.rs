//! Structural parsing: framing, extras preservation, raw-text round-trip,
//! error reporting.

use ical_timeline::{Component, ParserError, parse};

const CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:A\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220101T090000Z\r\n\
DTEND:20220101T100000Z\r\n\
SUMMARY:First\r\n\
END:VEVENT\r\n\
BEGIN:X-EXPERIMENT\r\n\
X-KNOB:11\r\n\
END:X-EXPERIMENT\r\n\
END:VCALENDAR\r\n";

#[test]
fn parses_lf_and_crlf() {
    assert!(parse(CALENDAR).is_ok());
    assert!(parse(&CALENDAR.replace("\r\n", "\n")).is_ok());
    assert!(parse(CALENDAR.trim_end()).is_ok());
}

#[test]
fn first_line_must_open_a_vcalendar() {
    assert!(matches!(parse(""), Err(ParserError::MissingHeader)));
    assert!(matches!(
        parse("VERSION:2.0\r\n"),
        Err(ParserError::MissingHeader)
    ));
    assert!(matches!(
        parse("BEGIN:VEVENT\r\nEND:VEVENT\r\n"),
        Err(ParserError::MissingHeader)
    ));
}

#[test]
fn unknown_component_is_preserved_in_extras() {
    let calendar = parse(CALENDAR).unwrap();
    assert_eq!(calendar.extras.len(), 1);
    assert_eq!(calendar.extras[0].name, "X-EXPERIMENT");
    assert_eq!(calendar.extras[0].key(), "x_experiment");
    assert_eq!(
        calendar.extras[0]
            .get_property("X-KNOB")
            .and_then(|prop| prop.value.as_deref()),
        Some("11")
    );
}

#[test]
fn unknown_property_is_kept_verbatim() {
    let text = CALENDAR.replace(
        "SUMMARY:First\r\n",
        "SUMMARY:First\r\nX-MOOD;LEVEL=7:happy\r\n",
    );
    let calendar = parse(&text).unwrap();
    let prop = calendar.events[0].get_property("X-MOOD").unwrap();
    assert_eq!(prop.value.as_deref(), Some("happy"));
    assert_eq!(prop.get_param("LEVEL"), Some("7"));
}

#[test]
fn component_line_ranges_round_trip_to_original_text() {
    let calendar = parse(CALENDAR).unwrap();
    let (start, end) = calendar.events[0].line_range();
    assert_eq!((start, end), (4, 10));
    let slice = calendar.get_original_ical_text(start, end).unwrap();
    assert_eq!(
        slice,
        "BEGIN:VEVENT\n\
UID:A\n\
DTSTAMP:20220101T000000Z\n\
DTSTART:20220101T090000Z\n\
DTEND:20220101T100000Z\n\
SUMMARY:First\n\
END:VEVENT"
    );

    let (start, end) = calendar.line_range();
    let whole = calendar.get_original_ical_text(start, end).unwrap();
    assert_eq!(whole, CALENDAR.replace("\r\n", "\n").trim_end());
}

#[test]
fn original_text_is_bounds_checked() {
    let calendar = parse(CALENDAR).unwrap();
    assert!(calendar.get_original_ical_text(0, 3).is_none());
    assert!(calendar.get_original_ical_text(5, 4).is_none());
    assert!(calendar.get_original_ical_text(10_000, 10_001).is_none());
}

#[test]
fn mismatched_end_reports_the_line() {
    let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:A\r\nEND:VTODO\r\n";
    match parse(text) {
        Err(ParserError::MismatchedEnd { expected, found, line }) => {
            assert_eq!(expected, "VEVENT");
            assert_eq!(found, "VTODO");
            assert_eq!(line, 4);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn unterminated_component_reports_where_it_opened() {
    let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:A\r\n";
    match parse(text) {
        Err(ParserError::UnterminatedComponent { name, line }) => {
            assert_eq!(name, "VEVENT");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn malformed_property_line_reports_the_line() {
    let text = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nJUSTAWORD\r\nEND:VCALENDAR\r\n";
    match parse(text) {
        Err(ParserError::Property(err)) => assert_eq!(err.line_number(), Some(3)),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn calendar_level_properties() {
    let calendar = parse(CALENDAR).unwrap();
    assert_eq!(calendar.get_version().unwrap(), "2.0");
    assert_eq!(calendar.get_prodid().unwrap(), "-//test//EN");
    assert_eq!(calendar.get_calendar_scale().unwrap(), "GREGORIAN");
    assert_eq!(calendar.get_method().unwrap(), None);
}

#[test]
fn alarms_nest_under_events() {
    let text = CALENDAR.replace(
        "SUMMARY:First\r\n",
        "SUMMARY:First\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT15M\r\n\
END:VALARM\r\n",
    );
    let calendar = parse(&text).unwrap();
    let alarm = &calendar.events[0].alarms[0];
    let timezones = calendar.timezone_registry();
    assert_eq!(alarm.get_action(timezones).unwrap(), "DISPLAY");
    assert!(alarm.get_repeat(timezones).unwrap().is_none());
}

#[test]
fn duplicate_single_valued_property_keeps_the_later() {
    let text = CALENDAR.replace(
        "SUMMARY:First\r\n",
        "SUMMARY:First\r\nSUMMARY:Second\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timezones = calendar.timezone_registry();
    assert_eq!(
        calendar.events[0].get_summary(timezones).unwrap().as_deref(),
        Some("Second")
    );
}
