//! End-to-end scenarios: parse a full stream, query the timeline, check
//! the occurrences that come out.

use ical_timeline::{CalDateTime, CalendarItem, Component, Occurrence, parse};

fn dt(value: &str) -> CalDateTime {
    CalDateTime::parse(value, None).unwrap()
}

fn starts(occurrences: &[Occurrence]) -> Vec<String> {
    occurrences
        .iter()
        .map(|occurrence| occurrence.timespan.begin.utc().format("%Y%m%dT%H%M%SZ").to_string())
        .collect()
}

fn calendar_with(body: &str) -> String {
    format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n{body}END:VCALENDAR\r\n"
    )
}

#[test]
fn single_event_in_range() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:A\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220101T090000Z\r\n\
DTEND:20220101T100000Z\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.get_limited_timeline(dt("20220101T000000Z"), dt("20220102T000000Z"));
    let occurrences: Vec<_> = timeline.iterate().unwrap().collect();

    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].timespan.begin, dt("20220101T090000Z"));
    assert_eq!(occurrences[0].timespan.end, dt("20220101T100000Z"));
    let CalendarItem::Event(event) = occurrences[0].component else {
        panic!("expected an event");
    };
    assert_eq!(
        event
            .get_property("UID")
            .and_then(|prop| prop.value.as_deref()),
        Some("A")
    );
}

#[test]
fn weekly_rrule_with_count() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:weekly\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220103T090000Z\r\n\
DTEND:20220103T100000Z\r\n\
RRULE:FREQ=WEEKLY;COUNT=5;BYDAY=MO\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.get_limited_timeline(dt("20220101T000000Z"), dt("20220301T000000Z"));
    let occurrences: Vec<_> = timeline.iterate().unwrap().collect();

    assert_eq!(
        starts(&occurrences),
        vec![
            "20220103T090000Z",
            "20220110T090000Z",
            "20220117T090000Z",
            "20220124T090000Z",
            "20220131T090000Z",
        ]
    );
}

#[test]
fn rdate_plus_exdate() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:rd\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220601T120000Z\r\n\
DTEND:20220601T130000Z\r\n\
RDATE:20220602T120000Z,20220603T120000Z\r\n\
EXDATE:20220603T120000Z\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.get_limited_timeline(dt("20220601T000000Z"), dt("20220610T000000Z"));
    let occurrences: Vec<_> = timeline.iterate().unwrap().collect();

    assert_eq!(
        starts(&occurrences),
        vec!["20220601T120000Z", "20220602T120000Z"]
    );
}

#[test]
fn recurrence_id_override_replaces_one_instance() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:B\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220505T080000Z\r\n\
DTEND:20220505T090000Z\r\n\
RRULE:FREQ=DAILY;COUNT=3\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:B\r\n\
DTSTAMP:20220101T000000Z\r\n\
RECURRENCE-ID:20220506T080000Z\r\n\
DTSTART:20220506T120000Z\r\n\
DTEND:20220506T130000Z\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();

    assert_eq!(
        starts(&occurrences),
        vec!["20220505T080000Z", "20220506T120000Z", "20220507T080000Z"]
    );
}

#[test]
fn vtimezone_localizes_event_starts() {
    let text = calendar_with(
        "BEGIN:VTIMEZONE\r\n\
TZID:Europe/Berlin\r\n\
BEGIN:DAYLIGHT\r\n\
TZNAME:CEST\r\n\
DTSTART:19810329T020000\r\n\
TZOFFSETFROM:+0100\r\n\
TZOFFSETTO:+0200\r\n\
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU\r\n\
END:DAYLIGHT\r\n\
BEGIN:STANDARD\r\n\
TZNAME:CET\r\n\
DTSTART:19961027T030000\r\n\
TZOFFSETFROM:+0200\r\n\
TZOFFSETTO:+0100\r\n\
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:tz\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART;TZID=Europe/Berlin:20220327T020000\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();

    // 02:00 on the last March Sunday is already past the spring-forward
    // transition, so +02:00 applies: the instant is 00:00Z.
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].timespan.begin.utc(), dt("20220327T000000Z").utc());
}

#[test]
fn folded_description_unfolds() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:fold\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220101T090000Z\r\n\
DESCRIPTION:This description spans\r\n\
  three folded lines and reads\r\n\
  as one value.\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let description = calendar.events[0]
        .get_property("DESCRIPTION")
        .and_then(|prop| prop.value.as_deref());
    assert_eq!(
        description,
        Some("This description spans three folded lines and reads as one value.")
    );
}

#[test]
fn timeline_is_chronological_and_range_closed() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:late\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220301T090000Z\r\n\
DTEND:20220301T100000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:early\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220101T090000Z\r\n\
RRULE:FREQ=WEEKLY;COUNT=10\r\n\
END:VEVENT\r\n\
BEGIN:VTODO\r\n\
UID:todo\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220115T080000Z\r\n\
DUE:20220115T170000Z\r\n\
END:VTODO\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.get_limited_timeline(dt("20220101T000000Z"), dt("20220401T000000Z"));
    let occurrences: Vec<_> = timeline.iterate().unwrap().collect();

    assert!(occurrences.len() > 10);
    for pair in occurrences.windows(2) {
        assert!(pair[0].timespan.begin <= pair[1].timespan.begin);
    }
    for occurrence in &occurrences {
        assert!(occurrence.timespan.intersects(timeline.range()));
    }
}

#[test]
fn query_filters() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:q\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220110T090000Z\r\n\
DTEND:20220110T110000Z\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.timeline();

    // Wholly inside.
    assert_eq!(
        timeline
            .includes(dt("20220110T000000Z"), dt("20220111T000000Z"))
            .unwrap()
            .count(),
        1
    );
    // Only partially inside: overlapping sees it, includes does not.
    assert_eq!(
        timeline
            .includes(dt("20220110T100000Z"), dt("20220111T000000Z"))
            .unwrap()
            .count(),
        0
    );
    assert_eq!(
        timeline
            .overlapping(dt("20220110T100000Z"), dt("20220111T000000Z"))
            .unwrap()
            .count(),
        1
    );
    assert_eq!(timeline.at(dt("20220110T093000Z")).unwrap().count(), 1);
    assert_eq!(timeline.at(dt("20220110T110000Z")).unwrap().count(), 0);
    assert_eq!(timeline.start_after(dt("20220110T090000Z")).unwrap().count(), 0);
    assert_eq!(timeline.start_after(dt("20220110T085959Z")).unwrap().count(), 1);
}

#[test]
fn journal_occurs_as_instant() {
    let text = calendar_with(
        "BEGIN:VJOURNAL\r\n\
UID:j\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220120T100000Z\r\n\
END:VJOURNAL\r\n",
    );
    let calendar = parse(&text).unwrap();
    let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0].timespan.begin, occurrences[0].timespan.end);
    assert!(matches!(occurrences[0].component, CalendarItem::Journal(_)));
}

#[test]
fn freebusy_is_a_single_timespan() {
    let text = calendar_with(
        "BEGIN:VFREEBUSY\r\n\
UID:fb\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220201T000000Z\r\n\
DTEND:20220202T000000Z\r\n\
FREEBUSY:20220201T090000Z/PT1H,20220201T140000Z/PT2H\r\n\
END:VFREEBUSY\r\n",
    );
    let calendar = parse(&text).unwrap();
    let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();
    assert_eq!(occurrences.len(), 1);
    assert!(matches!(occurrences[0].component, CalendarItem::FreeBusy(_)));
    let CalendarItem::FreeBusy(free_busy) = occurrences[0].component else {
        unreachable!();
    };
    let periods = free_busy
        .get_periods(calendar.timezone_registry())
        .unwrap();
    assert_eq!(periods.len(), 2);
}

#[test]
fn all_day_event_expands_by_date() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:allday\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART;VALUE=DATE:20220601\r\n\
DTEND;VALUE=DATE:20220602\r\n\
RRULE:FREQ=DAILY;COUNT=3\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let occurrences: Vec<_> = calendar.timeline().iterate().unwrap().collect();
    assert_eq!(
        starts(&occurrences),
        vec!["20220601T000000Z", "20220602T000000Z", "20220603T000000Z"]
    );
    // Each instance keeps the one-day derived duration.
    assert_eq!(occurrences[0].timespan.end.utc(), dt("20220602T000000Z").utc());
}

#[test]
fn unbounded_rrule_is_cut_by_the_range() {
    let text = calendar_with(
        "BEGIN:VEVENT\r\n\
UID:unbounded\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220101T090000Z\r\n\
RRULE:FREQ=DAILY\r\n\
END:VEVENT\r\n",
    );
    let calendar = parse(&text).unwrap();
    let timeline = calendar.get_limited_timeline(dt("20220101T000000Z"), dt("20220108T000000Z"));
    let occurrences: Vec<_> = timeline.iterate().unwrap().collect();
    assert_eq!(occurrences.len(), 7);
}
