// Tolerant timestamp parsing for `fecha_hora` / `ultimo_movimiento`.
//
// The upstream emits whatever its JSON encoder produces for a MySQL
// datetime: Flask turns datetime objects into RFC 2822 HTTP dates
// ("Tue, 26 Aug 2025 14:03:22 GMT"), other deployments emit RFC 3339,
// and string-typed columns arrive as naive "YYYY-MM-DD HH:MM:SS".
// Naive times are taken as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp in any of the shapes the upstream is known to emit.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter for required timestamp fields.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp {raw:?}")))
}

/// Serde adapter for nullable timestamp fields.
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized timestamp {raw:?}"))
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 26, 14, 3, 22).unwrap()
    }

    #[test]
    fn parses_rfc3339() {
        assert_eq!(parse("2025-08-26T14:03:22Z"), Some(expected()));
        assert_eq!(parse("2025-08-26T16:03:22+02:00"), Some(expected()));
    }

    #[test]
    fn parses_rfc2822_http_date() {
        assert_eq!(parse("Tue, 26 Aug 2025 14:03:22 GMT"), Some(expected()));
    }

    #[test]
    fn parses_naive_sql_datetime_as_utc() {
        assert_eq!(parse("2025-08-26 14:03:22"), Some(expected()));
        assert_eq!(parse("2025-08-26T14:03:22"), Some(expected()));
    }

    #[test]
    fn parses_fractional_seconds() {
        let dt = parse("2025-08-26 14:03:22.500").unwrap();
        assert_eq!(dt.timestamp(), expected().timestamp());
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn all_shapes_agree_on_the_instant() {
        let shapes = [
            "2025-08-26T14:03:22Z",
            "Tue, 26 Aug 2025 14:03:22 GMT",
            "2025-08-26 14:03:22",
        ];
        for raw in shapes {
            assert_eq!(parse(raw), Some(expected()), "shape {raw:?}");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("not a date"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("26/08/2025"), None);
    }
}
