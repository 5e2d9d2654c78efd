//! 宽松反序列化
//!
//! 前端表单经常把数字作为字符串提交（如 `"candidate_id": "12"`），
//! 这里同时接受 JSON 数字和数字字符串。

use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

// 支持字符串到 i64 的转换
pub fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

// 支持字符串到 f64 的转换，拒绝 NaN 与无穷大
pub fn deserialize_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a finite number or a string containing a finite number")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value as f64)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(Error::invalid_value(Unexpected::Float(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
            }
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

// 可选 i64，空字符串视为 None（用于查询参数筛选）
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &"an integer")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::deserialize_string_to_i64")]
        id: i64,
        #[serde(deserialize_with = "super::deserialize_string_to_f64")]
        score: f64,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let a: Probe = serde_json::from_str(r#"{"id": 3, "score": 9.5}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"id": "3", "score": "9.5"}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_rejects_garbage_scores() {
        assert!(serde_json::from_str::<Probe>(r#"{"id": 1, "score": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"id": 1, "score": ""}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"id": 1, "score": "NaN"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"id": 1}"#).is_err());
    }
}
