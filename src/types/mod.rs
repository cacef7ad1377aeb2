mod date;
pub use date::*;
mod datetime;
pub use datetime::*;
mod dateordatetime;
pub use dateordatetime::*;
mod duration;
pub use duration::*;
mod period;
pub use period::*;
mod timespan;
pub use timespan::*;
mod timezone;
pub use timezone::*;

/// Failure to derive a typed view from a raw property value.
///
/// These errors surface when a value is read, never during structural
/// parsing, so callers that ignore a field are not blocked by it.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("datetime string {0} has an invalid format")]
    InvalidDatetimeFormat(String),
    #[error("date string {0} has an invalid format")]
    InvalidDateFormat(String),
    #[error("duration string {0} has an invalid format")]
    InvalidDurationFormat(String),
    #[error("period string {0} has an invalid format")]
    InvalidPeriodFormat(String),
    #[error("UTC offset string {0} has an invalid format")]
    InvalidOffsetFormat(String),
    #[error("geographic position {0} has an invalid format")]
    InvalidGeoFormat(String),
    #[error("integer value {0} has an invalid format")]
    InvalidIntFormat(String),
    #[error("unsupported VALUE parameter {0}")]
    InvalidValueType(String),
    #[error("TZID {0} does not refer to a timezone known to this calendar")]
    UnknownTimezone(String),
    #[error("timestamp does not exist because of a gap in local time")]
    LocalTimeGap,
    #[error("recurrence rule {rule} is invalid: {reason}")]
    InvalidRule { rule: String, reason: String },
}
