//! Record Parser
//!
//! Pure domain logic turning one raw CSV row into a validated `GeoRecord`.
//! This service has NO external dependencies - it's pure Rust.

use crate::domain::entities::GeoRecord;
use std::fmt;
use std::net::IpAddr;

/// Number of columns in a source row.
pub const FIELD_COUNT: usize = 7;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldViolation {
    #[error("invalid row length: expected {expected}, got {found}")]
    RecordSize { expected: usize, found: usize },
    #[error("invalid IP address")]
    Ip,
    #[error("invalid country code")]
    CountryCode,
    #[error("invalid country")]
    Country,
    #[error("invalid city")]
    City,
    #[error("invalid latitude")]
    Latitude,
    #[error("invalid longitude")]
    Longitude,
}

/// Every constraint a rejected row violated.
///
/// The import pipeline only needs to know the row is unusable; the list
/// exists for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn contains(&self, violation: &FieldViolation) -> bool {
        self.violations.contains(violation)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad record")?;
        for (i, v) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Parser for the seven-column geolocation row format:
/// `ip_address,country_code,country,city,latitude,longitude,mystery_value`.
pub struct RecordParser;

impl RecordParser {
    /// Validate one row.
    ///
    /// All violations are collected, including a wrong column count; missing
    /// columns read as empty. The row is accepted only if none are found.
    /// The IP is stored in its canonical textual form.
    pub fn parse<S: AsRef<str>>(fields: &[S]) -> Result<GeoRecord, ValidationFailure> {
        let field = |i: usize| fields.get(i).map(|s| s.as_ref()).unwrap_or("");
        let mut violations = Vec::new();

        if fields.len() != FIELD_COUNT {
            violations.push(FieldViolation::RecordSize {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        let ip_address = match field(0).parse::<IpAddr>() {
            Ok(ip) => ip.to_string(),
            Err(_) => {
                violations.push(FieldViolation::Ip);
                String::new()
            }
        };

        let country_code = field(1);
        if country_code.chars().count() != 2 {
            violations.push(FieldViolation::CountryCode);
        }

        let country = field(2);
        if country.is_empty() {
            violations.push(FieldViolation::Country);
        }

        let city = field(3);
        if city.is_empty() {
            violations.push(FieldViolation::City);
        }

        let latitude = Self::parse_coordinate(field(4), 90.0)
            .unwrap_or_else(|| {
                violations.push(FieldViolation::Latitude);
                0.0
            });

        let longitude = Self::parse_coordinate(field(5), 180.0)
            .unwrap_or_else(|| {
                violations.push(FieldViolation::Longitude);
                0.0
            });

        if !violations.is_empty() {
            return Err(ValidationFailure { violations });
        }

        Ok(GeoRecord {
            ip_address,
            country_code: country_code.to_string(),
            country: country.to_string(),
            city: city.to_string(),
            latitude,
            longitude,
            mystery_value: field(6).to_string(),
        })
    }

    /// Parse a coordinate and check it lies in `[-limit, limit]`.
    /// NaN and infinities are rejected by the range check.
    fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
        raw.parse::<f64>()
            .ok()
            .filter(|v| (-limit..=limit).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> Vec<&'static str> {
        vec![
            "200.106.141.15",
            "SI",
            "Nepal",
            "DuBuquemouth",
            "-84.87503094689836",
            "7.206435933364332",
            "7823011346",
        ]
    }

    fn with_field(i: usize, value: &'static str) -> Vec<&'static str> {
        let mut row = valid_row();
        row[i] = value;
        row
    }

    #[test]
    fn test_parse_valid_row() {
        let record = RecordParser::parse(&valid_row()).unwrap();

        assert_eq!(record.ip_address, "200.106.141.15");
        assert_eq!(record.country_code, "SI");
        assert_eq!(record.country, "Nepal");
        assert_eq!(record.city, "DuBuquemouth");
        assert_eq!(record.latitude, -84.87503094689836);
        assert_eq!(record.longitude, 7.206435933364332);
        assert_eq!(record.mystery_value, "7823011346");
    }

    #[test]
    fn test_parse_accepts_owned_strings() {
        let row: Vec<String> = valid_row().into_iter().map(String::from).collect();
        assert!(RecordParser::parse(&row).is_ok());
    }

    #[test]
    fn test_parse_ipv6() {
        let record = RecordParser::parse(&with_field(0, "2001:db8::1")).unwrap();
        assert_eq!(record.ip_address, "2001:db8::1");
    }

    #[test]
    fn test_parse_canonicalizes_ipv6() {
        let record = RecordParser::parse(&with_field(0, "2001:0db8:0000:0000:0000:0000:0000:0001")).unwrap();
        assert_eq!(record.ip_address, "2001:db8::1");
    }

    #[test]
    fn test_mystery_value_is_not_validated() {
        let record = RecordParser::parse(&with_field(6, "")).unwrap();
        assert_eq!(record.mystery_value, "");
    }

    #[test]
    fn test_single_bad_field_rejects_whole_record() {
        let cases = vec![
            (0, "", FieldViolation::Ip),
            (0, "0.0", FieldViolation::Ip),
            (0, "300.1.1.1", FieldViolation::Ip),
            (1, "S", FieldViolation::CountryCode),
            (1, "SIX", FieldViolation::CountryCode),
            (2, "", FieldViolation::Country),
            (3, "", FieldViolation::City),
            (4, "north", FieldViolation::Latitude),
            (4, "90.0001", FieldViolation::Latitude),
            (4, "NaN", FieldViolation::Latitude),
            (5, "-180.5", FieldViolation::Longitude),
            (5, "inf", FieldViolation::Longitude),
        ];

        for (i, value, expected) in cases {
            let err = RecordParser::parse(&with_field(i, value)).unwrap_err();
            assert_eq!(err.violations, vec![expected], "field {} = {:?}", i, value);
        }
    }

    #[test]
    fn test_coordinate_bounds_are_inclusive() {
        let cases = vec![("90", "180"), ("-90", "-180"), ("90.0", "-180.0"), ("0", "0")];

        for (lat, lon) in cases {
            let mut row = valid_row();
            row[4] = lat;
            row[5] = lon;
            assert!(RecordParser::parse(&row).is_ok(), "lat={} lon={}", lat, lon);
        }
    }

    #[test]
    fn test_country_code_counts_characters() {
        assert!(RecordParser::parse(&with_field(1, "ÅÖ")).is_ok());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let row = vec![
            "",
            "PY",
            "Falkland Islands (Malvinas)",
            "",
            "abc",
            "-244.69",
            "0",
        ];

        let err = RecordParser::parse(&row).unwrap_err();

        assert_eq!(
            err.violations,
            vec![
                FieldViolation::Ip,
                FieldViolation::City,
                FieldViolation::Latitude,
                FieldViolation::Longitude,
            ]
        );
    }

    #[test]
    fn test_short_row_reports_size_and_missing_fields() {
        let row = vec!["70.95.73.73", "TL", "Saudi Arabia"];

        let err = RecordParser::parse(&row).unwrap_err();

        assert!(err.contains(&FieldViolation::RecordSize { expected: 7, found: 3 }));
        assert!(err.contains(&FieldViolation::City));
        assert!(err.contains(&FieldViolation::Latitude));
        assert!(err.contains(&FieldViolation::Longitude));
        assert!(!err.contains(&FieldViolation::Ip));
    }

    #[test]
    fn test_long_row_is_rejected() {
        let mut row = valid_row();
        row.push("extra");

        let err = RecordParser::parse(&row).unwrap_err();

        assert_eq!(
            err.violations,
            vec![FieldViolation::RecordSize { expected: 7, found: 8 }]
        );
    }

    #[test]
    fn test_empty_row() {
        let row: Vec<&str> = Vec::new();
        let err = RecordParser::parse(&row).unwrap_err();
        assert_eq!(err.violations.len(), 7);
    }

    #[test]
    fn test_validation_failure_display() {
        let failure = ValidationFailure {
            violations: vec![FieldViolation::Ip, FieldViolation::City],
        };
        assert_eq!(failure.to_string(), "bad record: invalid IP address; invalid city");
    }
}
