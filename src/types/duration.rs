use crate::types::ValueError;
use chrono::Duration;
use lazy_static::lazy_static;

lazy_static! {
    static ref RE_DURATION: regex::Regex = regex::Regex::new(
        r"(?x)
        ^(?<sign>[+-])?
        P (
            (
                ((?P<D>\d+)D)?  # days
                (
                    T
                    ((?P<H>\d+)H)?
                    ((?P<M>\d+)M)?
                    ((?P<S>\d+)S)?
                )?
            )  # dur-date / dur-time
            | (
                (?P<W>\d+)W
            )  # dur-week
        )
        $"
    )
    .unwrap();
}

/// Parse an RFC 5545 DURATION value, a signed subset of ISO-8601 durations:
/// `P[n]W` or `P[n]DT[n]H[n]M[n]S`.
pub fn parse_duration(string: &str) -> Result<Duration, ValueError> {
    let captures = RE_DURATION
        .captures(string)
        .ok_or_else(|| ValueError::InvalidDurationFormat(string.to_owned()))?;

    let mut duration = Duration::zero();
    let mut any = false;
    for (name, to_duration) in [
        ("W", Duration::weeks as fn(i64) -> Duration),
        ("D", Duration::days),
        ("H", Duration::hours),
        ("M", Duration::minutes),
        ("S", Duration::seconds),
    ] {
        if let Some(amount) = captures.name(name) {
            any = true;
            // The regex only matches digit runs here.
            duration += to_duration(amount.as_str().parse().unwrap());
        }
    }
    if !any {
        // A bare "P" or "PT" names no interval at all.
        return Err(ValueError::InvalidDurationFormat(string.to_owned()));
    }

    if captures.name("sign").is_some_and(|sign| sign.as_str() == "-") {
        duration = -duration;
    }

    Ok(duration)
}
