use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn calendar_text(events: usize) -> String {
    let mut text = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//bench//EN\r\n");
    for index in 0..events {
        text.push_str(&format!(
            "BEGIN:VEVENT\r\n\
UID:event-{index}\r\n\
DTSTAMP:20220101T000000Z\r\n\
DTSTART:20220103T090000Z\r\n\
DTEND:20220103T100000Z\r\n\
SUMMARY:Event number {index} with a summary long enough to be folded acro\r\n ss two lines\r\n\
RRULE:FREQ=WEEKLY;COUNT=10;BYDAY=MO\r\n\
END:VEVENT\r\n"
        ));
    }
    text.push_str("END:VCALENDAR\r\n");
    text
}

fn parse_benchmark(c: &mut Criterion) {
    let text = calendar_text(200);

    c.bench_function("parse 200 events", |b| {
        b.iter(|| ical_timeline::parse(black_box(&text)).unwrap())
    });

    let calendar = ical_timeline::parse(&text).unwrap();
    c.bench_function("expand 200 weekly series", |b| {
        b.iter(|| {
            let count = calendar.timeline().iterate().unwrap().count();
            black_box(count)
        })
    });
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
