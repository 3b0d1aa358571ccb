//! 查询参数反序列化辅助
//!
//! 查询字符串经过 `#[serde(flatten)]` 之后所有值都是字符串，
//! 数字与布尔过滤条件需要同时接受原生类型和字符串。

use serde::Deserializer;
use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

/// 可选 i64，接受数字或数字字符串，空字符串视为未提供
pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalI64Visitor;

    impl<'de> Visitor<'de> for OptionalI64Visitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional integer")
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            i64::try_from(value)
                .map(Some)
                .map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse()
                .map(Some)
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(OptionalI64Visitor)
}

/// 可选 bool，接受 true/false/1/0 及其字符串形式
pub fn optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalBoolVisitor;

    impl<'de> Visitor<'de> for OptionalBoolVisitor {
        type Value = Option<bool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional boolean")
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            match value.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
            }
        }
    }

    deserializer.deserialize_any(OptionalBoolVisitor)
}

#[cfg(test)]
mod tests {
    use actix_web::web::Query;
    use serde::Deserialize;

    use super::*;
    use crate::models::common::PaginationQuery;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "optional_i64")]
        student_id: Option<i64>,
        #[serde(default, deserialize_with = "optional_bool")]
        unread_only: Option<bool>,
    }

    #[test]
    fn test_flattened_query_string() {
        let params =
            Query::<Params>::from_query("page=2&student_id=42&unread_only=true")
                .unwrap()
                .into_inner();
        assert_eq!(params.pagination.page, 2);
        assert_eq!(params.student_id, Some(42));
        assert_eq!(params.unread_only, Some(true));

        let params = Query::<Params>::from_query("student_id=")
            .unwrap()
            .into_inner();
        assert_eq!(params.student_id, None);
        assert_eq!(params.unread_only, None);
    }
}
