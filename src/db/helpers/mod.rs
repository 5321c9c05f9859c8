use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn to_severity(value: i64, field: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamps() {
        let parsed = parse_datetime("2026-08-27T10:30:00+02:00", "created_at").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-27T08:30:00+00:00");
        assert!(parse_datetime("yesterday", "created_at").is_err());
    }

    #[test]
    fn severity_conversion_rejects_values_outside_u8() {
        assert_eq!(to_severity(7, "severity").unwrap(), 7);
        assert!(to_severity(-1, "severity").is_err());
        assert!(to_severity(300, "severity").is_err());
    }
}
