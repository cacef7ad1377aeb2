use super::property;

// DATE-TIME-or-DATE properties. RECURRENCE-ID shares DTSTART's value space:
// its value is the original start of the instance it overrides.
property!("DTSTART", "DATE-TIME", IcalDTSTARTProperty, crate::types::CalDateOrDateTime);
property!("DTEND", "DATE-TIME", IcalDTENDProperty, crate::types::CalDateOrDateTime);
property!("DUE", "DATE-TIME", IcalDUEProperty, crate::types::CalDateOrDateTime);
property!(
    "RECURRENCE-ID",
    "DATE-TIME",
    IcalRECURRENCEIDProperty,
    crate::types::CalDateOrDateTime
);

// DATE-TIME-only properties.
property!("DTSTAMP", "DATE-TIME", IcalDTSTAMPProperty, crate::types::CalDateTime);
property!("CREATED", "DATE-TIME", IcalCREATEDProperty, crate::types::CalDateTime);
property!(
    "LAST-MODIFIED",
    "DATE-TIME",
    IcalLASTMODIFIEDProperty,
    crate::types::CalDateTime
);
property!("COMPLETED", "DATE-TIME", IcalCOMPLETEDProperty, crate::types::CalDateTime);

property!("DURATION", "DURATION", IcalDURATIONProperty, chrono::Duration);
