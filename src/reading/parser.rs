use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::infrastructure::AlertError;
use crate::models::number::deserialize_i64;
use crate::models::{LooseNumber, Reading};

/// 每个小时桶的秒数
pub const SECONDS_PER_HOUR: i64 = 3600;

const REQUIRED_KEYS: [&str; 3] = ["date", "last_update", "history"];

/// 上游文档：`{"date": <基准时间戳>, "last_update": <小时>, "history": {"<小时>": <PSI|null>}}`
#[derive(Debug, Deserialize)]
struct RawReading {
    #[serde(deserialize_with = "deserialize_i64")]
    date: i64,
    #[serde(deserialize_with = "deserialize_i64")]
    last_update: i64,
    history: HashMap<String, Option<LooseNumber>>,
}

/// 从原始文档解析出当前读数
///
/// 缺少 `date`、`last_update` 或 `history` 视为上游格式变化，返回
/// `MalformedReading`。对应小时的值为 null 或缺失时，读数的 `value` 为 `None`。
/// `date` 和 `last_update` 必须是整数，带小数部分的值不截断，同样视为格式错误。
pub fn parse(doc: &Value) -> Result<Reading, AlertError> {
    let object = doc
        .as_object()
        .ok_or_else(|| AlertError::malformed_reading("文档不是 JSON 对象", None))?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(AlertError::malformed_reading(format!("缺少字段 `{}`", key), Some(key)));
        }
    }

    let raw: RawReading = serde_json::from_value(doc.clone())?;

    let timestamp = raw
        .last_update
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|offset| raw.date.checked_add(offset))
        .ok_or_else(|| AlertError::malformed_reading("时间戳溢出", Some("last_update")))?;

    let key = raw.last_update.to_string();
    let value = match raw.history.get(&key) {
        None | Some(None) => None,
        Some(Some(number)) if number.is_blank() => None,
        Some(Some(number)) => Some(number.as_f64().ok_or_else(|| {
            AlertError::malformed_reading(format!("history[{}] 不是数字: {:?}", key, number), Some("history"))
        })?),
    };

    Ok(Reading::new(timestamp, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reading() {
        let doc = json!({
            "date": 1371744000,
            "last_update": 13,
            "history": {"12": 101, "13": 120.5}
        });

        let reading = parse(&doc).unwrap();
        assert_eq!(reading.timestamp, 1371744000 + 13 * 3600);
        assert_eq!(reading.value, Some(120.5));
    }

    #[test]
    fn test_null_value_is_absent() {
        let doc = json!({"date": 1000, "last_update": 5, "history": {"4": 90, "5": null}});
        let reading = parse(&doc).unwrap();
        assert_eq!(reading.timestamp, 1000 + 5 * 3600);
        assert_eq!(reading.value, None);
    }

    #[test]
    fn test_missing_bucket_is_absent() {
        let doc = json!({"date": 1000, "last_update": 5, "history": {"4": 90}});
        assert_eq!(parse(&doc).unwrap().value, None);
    }

    #[test]
    fn test_zero_is_a_real_value() {
        let doc = json!({"date": 1000, "last_update": 0, "history": {"0": 0}});
        let reading = parse(&doc).unwrap();
        assert_eq!(reading.timestamp, 1000);
        assert_eq!(reading.value, Some(0.0));
    }

    #[test]
    fn test_string_encoded_numbers() {
        let doc = json!({"date": "1000", "last_update": "2", "history": {"2": "87"}});
        let reading = parse(&doc).unwrap();
        assert_eq!(reading.timestamp, 1000 + 2 * 3600);
        assert_eq!(reading.value, Some(87.0));

        let blank = json!({"date": 1000, "last_update": 2, "history": {"2": ""}});
        assert_eq!(parse(&blank).unwrap().value, None);
    }

    #[test]
    fn test_missing_required_keys() {
        for key in REQUIRED_KEYS {
            let mut doc = json!({"date": 1000, "last_update": 1, "history": {"1": 50}});
            doc.as_object_mut().unwrap().remove(key);

            match parse(&doc).unwrap_err() {
                AlertError::MalformedReading { field, .. } => assert_eq!(field.as_deref(), Some(key)),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_fractional_time_fields_are_malformed() {
        let whole = json!({"date": 1000.0, "last_update": "2.0", "history": {"2": 87}});
        assert_eq!(parse(&whole).unwrap().timestamp, 1000 + 2 * 3600);

        for doc in [
            json!({"date": 1371744000.5, "last_update": 1, "history": {"1": 50}}),
            json!({"date": 1000, "last_update": 1.5, "history": {"1": 50}}),
        ] {
            let err = parse(&doc).unwrap_err();
            assert!(matches!(err, AlertError::MalformedReading { .. }), "doc: {}", doc);
        }
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        let cases = [
            json!([1, 2, 3]),
            json!({"date": "yesterday", "last_update": 1, "history": {}}),
            json!({"date": 1000, "last_update": 1, "history": [50]}),
            json!({"date": 1000, "last_update": 1, "history": {"1": "high"}}),
            json!({"date": i64::MAX, "last_update": 1, "history": {}}),
        ];

        for doc in cases {
            let err = parse(&doc).unwrap_err();
            assert!(matches!(err, AlertError::MalformedReading { .. }), "doc: {}", doc);
        }
    }
}
