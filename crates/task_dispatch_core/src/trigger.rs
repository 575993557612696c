//! Storage change notifications as delivered by the object store.
//!
//! Only the first record of a notification is dispatched. Object keys arrive
//! form-encoded (`+` for spaces, `%XX` for reserved bytes) and are decoded
//! before they reach the task environment.

use percent_encoding::percent_decode_str;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DispatchError;

/// Records stay untyped so that only the dispatched one is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    pub s3: StorageEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// The object a notification points at, with the key already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerObject {
    pub bucket: String,
    pub key: String,
}

pub fn parse_trigger(event: &Value) -> Result<TriggerObject, DispatchError> {
    let notification = StorageNotification::deserialize(event)
        .map_err(|error| DispatchError::MalformedTrigger(error.to_string()))?;

    let Some(first) = notification.records.first() else {
        return Err(DispatchError::MalformedTrigger(
            "Records must contain at least one record".to_string(),
        ));
    };
    let record = NotificationRecord::deserialize(first)
        .map_err(|error| DispatchError::MalformedTrigger(error.to_string()))?;

    Ok(TriggerObject {
        bucket: record.s3.bucket.name,
        key: decode_object_key(&record.s3.object.key),
    })
}

/// Decodes a form-encoded object key. Invalid UTF-8 is replaced, not rejected.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn notification(bucket: &str, key: &str) -> Value {
        json!({
            "Records": [
                {
                    "eventSource": "aws:s3",
                    "eventName": "ObjectCreated:Put",
                    "s3": {
                        "bucket": {"name": bucket, "arn": "arn:aws:s3:::b"},
                        "object": {"key": key, "size": 1024}
                    }
                }
            ]
        })
    }

    #[test]
    fn decodes_percent_escaped_plus() {
        assert_eq!(decode_object_key("a%2Bb"), "a+b");
    }

    #[test]
    fn decodes_plus_as_space() {
        assert_eq!(decode_object_key("reports/my+file.csv"), "reports/my file.csv");
    }

    #[test]
    fn decodes_multibyte_utf8() {
        assert_eq!(decode_object_key("caf%C3%A9.txt"), "café.txt");
    }

    #[test]
    fn replaces_invalid_utf8_instead_of_failing() {
        assert_eq!(decode_object_key("bad%FF"), "bad\u{FFFD}");
    }

    #[test]
    fn parses_first_record_and_decodes_key() {
        let trigger = parse_trigger(&notification("b", "a%2Bb")).expect("trigger should parse");
        assert_eq!(
            trigger,
            TriggerObject {
                bucket: "b".to_string(),
                key: "a+b".to_string(),
            }
        );
    }

    #[test]
    fn ignores_records_after_the_first() {
        let event = json!({
            "Records": [
                {"s3": {"bucket": {"name": "first"}, "object": {"key": "one"}}},
                {"s3": {"bucket": {"name": "second"}, "object": {"key": "two"}}}
            ]
        });

        let trigger = parse_trigger(&event).expect("trigger should parse");
        assert_eq!(trigger.bucket, "first");
        assert_eq!(trigger.key, "one");
    }

    #[test]
    fn malformed_later_record_does_not_block_the_first() {
        let event = json!({
            "Records": [
                {"s3": {"bucket": {"name": "first"}, "object": {"key": "one"}}},
                {"eventSource": "aws:sqs"}
            ]
        });

        let trigger = parse_trigger(&event).expect("first record should still dispatch");
        assert_eq!(trigger.bucket, "first");
        assert_eq!(trigger.key, "one");
    }

    #[test]
    fn rejects_malformed_first_record() {
        let event = json!({
            "Records": [
                {"eventSource": "aws:sqs"},
                {"s3": {"bucket": {"name": "second"}, "object": {"key": "two"}}}
            ]
        });

        let error = parse_trigger(&event).expect_err("malformed first record should fail");
        assert!(error.to_string().contains("s3"));
    }

    #[test]
    fn rejects_empty_records() {
        let error = parse_trigger(&json!({"Records": []})).expect_err("empty records should fail");
        assert!(matches!(error, DispatchError::MalformedTrigger(_)));
    }

    #[test]
    fn rejects_missing_records() {
        let error = parse_trigger(&json!({"detail": {}})).expect_err("missing records should fail");
        assert!(matches!(error, DispatchError::MalformedTrigger(_)));
    }

    #[test]
    fn rejects_record_without_object_key() {
        let event = json!({
            "Records": [
                {"s3": {"bucket": {"name": "b"}, "object": {"size": 3}}}
            ]
        });

        let error = parse_trigger(&event).expect_err("missing key should fail");
        assert!(error.to_string().contains("key"));
    }
}
