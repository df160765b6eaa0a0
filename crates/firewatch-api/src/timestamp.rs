// Timestamp parsing for detector payloads.
//
// The detector writes naive local time (`2024-06-15T10:30:00.123`) while
// other producers may send RFC 3339 with an offset. Both are normalised to
// `DateTime<Local>`.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a detector timestamp. Returns `None` if no known format matches.
pub fn parse(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        // DST gaps have no local instant; folds take the earlier one.
        Local.from_local_datetime(&naive).earliest()
    })
}

/// Lenient serde adapter for `Option<DateTime<Local>>` fields.
///
/// A timestamp is display metadata, so a value that is not a string or
/// matches no known format decodes as `None` instead of failing the
/// enclosing payload.
pub mod option {
    use chrono::{DateTime, Local};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use tracing::debug;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(raw) => {
                let parsed = super::parse(&raw);
                if parsed.is_none() {
                    debug!(raw = %raw, "unparseable timestamp");
                }
                parsed
            }
            other => {
                debug!(value = %other, "non-string timestamp");
                None
            }
        })
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<DateTime<Local>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn parses_naive_detector_timestamp_as_local() {
        let dt = parse("2024-06-15T10:30:00.123").expect("naive timestamp");
        let expected = NaiveDate::from_ymd_opt(2024, 6, 15)
            .and_then(|d| d.and_hms_milli_opt(10, 30, 0, 123))
            .expect("valid date");
        assert_eq!(dt.naive_local(), expected);
    }

    #[test]
    fn parses_space_separated_timestamp() {
        let dt = parse("2024-06-15 10:30:00").expect("space-separated timestamp");
        assert_eq!(dt.naive_local().to_string(), "2024-06-15 10:30:00");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse("2024-06-15T10:30:00Z").expect("rfc3339 timestamp");
        assert_eq!(
            dt.with_timezone(&Utc).to_rfc3339(),
            "2024-06-15T10:30:00+00:00"
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("").is_none());
    }

    #[derive(serde::Deserialize)]
    struct Stamped {
        #[serde(default, with = "option")]
        at: Option<DateTime<Local>>,
    }

    fn stamped(json: &str) -> Option<DateTime<Local>> {
        serde_json::from_str::<Stamped>(json).expect("lenient field").at
    }

    #[test]
    fn odd_values_decode_as_none() {
        assert_eq!(stamped(r#"{"at": 1718445000}"#), None);
        assert_eq!(stamped(r#"{"at": "15/06/2024 10:30"}"#), None);
        assert_eq!(stamped(r#"{"at": {"nested": true}}"#), None);
        assert_eq!(stamped(r#"{"at": null}"#), None);
        assert_eq!(stamped("{}"), None);
        assert!(stamped(r#"{"at": "2024-06-15T10:30:00"}"#).is_some());
    }
}
