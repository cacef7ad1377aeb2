use super::property;

// The recurrence family. RDATE entries may be DATE, DATE-TIME or PERIOD
// (selected by the VALUE parameter); EXDATE entries are DATE or DATE-TIME.
property!("RRULE", "RECUR", IcalRRULEProperty, crate::recurrence::RecurRule);
property!(
    "RDATE",
    "DATE-TIME",
    IcalRDATEProperty,
    Vec<crate::types::DateOrDateTimeOrPeriod>
);
property!(
    "EXDATE",
    "DATE-TIME",
    IcalEXDATEProperty,
    Vec<crate::types::CalDateOrDateTime>
);

// FREEBUSY advertises busy periods inside a VFREEBUSY component.
property!("FREEBUSY", "PERIOD", IcalFREEBUSYProperty, Vec<crate::types::Period>);
