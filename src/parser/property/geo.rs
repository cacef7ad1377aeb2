use super::property;
use crate::parser::ParserError;
use crate::property::ContentLine;
use crate::timezones::Timezones;
use crate::types::ValueError;

/// GEO values are `latitude;longitude` pairs of floats.
impl super::ParseProp for (f64, f64) {
    fn parse_prop(
        prop: &ContentLine,
        _timezones: &Timezones,
        _default_type: &str,
    ) -> Result<Self, ParserError> {
        let value = prop.value_or_empty();
        let invalid = || ValueError::InvalidGeoFormat(value.to_owned());
        let (latitude, longitude) = value.split_once(';').ok_or_else(invalid)?;
        Ok((
            latitude.trim().parse().map_err(|_| invalid())?,
            longitude.trim().parse().map_err(|_| invalid())?,
        ))
    }
}

property!("GEO", "FLOAT", IcalGEOProperty, (f64, f64));

#[cfg(test)]
mod tests {
    use super::IcalGEOProperty;
    use crate::parser::property::ICalProperty;
    use crate::property::PropertyParser;
    use crate::timezones::Timezones;

    fn content_line(input: &str) -> crate::property::ContentLine {
        PropertyParser::from_slice(input.as_bytes())
            .next()
            .unwrap()
            .unwrap()
    }

    #[test]
    fn splits_lat_lon() {
        let geo = IcalGEOProperty::parse_prop(
            &content_line("GEO:37.386013;-122.082932"),
            &Timezones::default(),
        )
        .unwrap();
        assert_eq!(geo.0, (37.386013, -122.082932));
    }

    #[test]
    fn rejects_single_float() {
        assert!(
            IcalGEOProperty::parse_prop(&content_line("GEO:37.386013"), &Timezones::default())
                .is_err()
        );
    }
}
