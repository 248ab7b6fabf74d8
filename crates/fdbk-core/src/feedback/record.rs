use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::store::Document;

/// One user feedback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub id: String,
    pub user_name: String,
    pub comment: String,
    /// Expected in 1..=5 but not validated.
    pub rating: i64,
    /// `None` when the document has no usable `createdAt`.
    pub created_at: Option<DateTime<Utc>>,
}

impl FeedbackRecord {
    /// Maps a stored document. Missing text fields become empty strings and a
    /// missing rating becomes 0.
    pub fn from_document(doc: &Document) -> Self {
        let text = |key: &str| {
            doc.fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: doc.id.clone(),
            user_name: text("userName"),
            comment: text("comment"),
            rating: doc.fields.get("rating").map_or(0, parse_rating),
            created_at: doc.fields.get("createdAt").and_then(parse_timestamp),
        }
    }
}

fn parse_rating(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Accepts RFC 3339 strings and `{seconds, nanos}` objects.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanos")
                .or_else(|| map.get("nanoseconds"))
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or_default();
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn doc(fields: Value) -> Document {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        Document::new("doc-1", fields)
    }

    #[test]
    fn test_maps_all_fields() {
        let record = FeedbackRecord::from_document(&doc(json!({
            "userName": "Maria",
            "comment": "Ótimo atendimento",
            "rating": 5,
            "createdAt": "2024-03-10T12:30:00Z",
        })));

        assert_eq!(record.id, "doc-1");
        assert_eq!(record.user_name, "Maria");
        assert_eq!(record.comment, "Ótimo atendimento");
        assert_eq!(record.rating, 5);
        assert_eq!(
            record.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record = FeedbackRecord::from_document(&doc(json!({})));
        assert_eq!(record.user_name, "");
        assert_eq!(record.comment, "");
        assert_eq!(record.rating, 0);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_rating_variants() {
        assert_eq!(parse_rating(&json!(4.6)), 5);
        assert_eq!(parse_rating(&json!("3")), 3);
        assert_eq!(parse_rating(&json!(true)), 0);
    }

    #[test]
    fn test_timestamp_variants() {
        let expected = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            parse_timestamp(&json!({"seconds": 1_700_000_000, "nanos": 0})),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp(&json!({"_seconds": 1_700_000_000, "_nanoseconds": 0})),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(
            parse_timestamp(&json!("2023-11-14T19:13:20-03:00")),
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );
    }
}
