use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ColumnTrait, ColumnType, Value};
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

/// Whether the column stores text.
pub fn is_text_column<C: ColumnTrait>(column: &C) -> bool {
    matches!(
        column.def().get_column_type(),
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_)
    )
}

/// Converts a JSON payload value into the typed value the column expects.
///
/// JSON `null` becomes a typed NULL; whether the column accepts it is left to
/// the store.
pub fn json_to_value<C: ColumnTrait>(column: &C, json: &JsonValue) -> AppResult<Value> {
    let name = column.as_str();
    let mismatch = |expected: &str| {
        AppError::BadRequest(format!("field `{name}` expects {expected}, got {json}"))
    };

    let value = match column.def().get_column_type() {
        ColumnType::Integer | ColumnType::SmallInteger | ColumnType::TinyInteger => match json {
            JsonValue::Null => Value::Int(None),
            JsonValue::Number(n) => {
                let n = n.as_i64().ok_or_else(|| mismatch("an integer"))?;
                Value::from(i32::try_from(n).map_err(|_| mismatch("a 32-bit integer"))?)
            }
            _ => return Err(mismatch("an integer")),
        },
        ColumnType::BigInteger => match json {
            JsonValue::Null => Value::BigInt(None),
            JsonValue::Number(n) => Value::from(n.as_i64().ok_or_else(|| mismatch("an integer"))?),
            _ => return Err(mismatch("an integer")),
        },
        ColumnType::Double | ColumnType::Float | ColumnType::Decimal(_) => match json {
            JsonValue::Null => Value::Double(None),
            JsonValue::Number(n) => Value::from(n.as_f64().ok_or_else(|| mismatch("a number"))?),
            _ => return Err(mismatch("a number")),
        },
        ColumnType::Boolean => match json {
            JsonValue::Null => Value::Bool(None),
            JsonValue::Bool(b) => Value::from(*b),
            _ => return Err(mismatch("a boolean")),
        },
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_) => match json {
            JsonValue::Null => Value::String(None),
            JsonValue::String(s) => Value::from(s.clone()),
            _ => return Err(mismatch("a string")),
        },
        ColumnType::Date => match json {
            JsonValue::Null => Value::ChronoDate(None),
            JsonValue::String(s) => {
                let date = s
                    .parse::<NaiveDate>()
                    .map_err(|_| mismatch("a YYYY-MM-DD date"))?;
                Value::from(date)
            }
            _ => return Err(mismatch("a YYYY-MM-DD date")),
        },
        ColumnType::TimestampWithTimeZone | ColumnType::Timestamp | ColumnType::DateTime => {
            match json {
                JsonValue::Null => Value::ChronoDateTimeUtc(None),
                JsonValue::String(s) => {
                    let at = DateTime::parse_from_rfc3339(s)
                        .map_err(|_| mismatch("an RFC 3339 timestamp"))?
                        .with_timezone(&Utc);
                    Value::from(at)
                }
                _ => return Err(mismatch("an RFC 3339 timestamp")),
            }
        }
        ColumnType::Json | ColumnType::JsonBinary => match json {
            JsonValue::Null => Value::Json(None),
            other => Value::from(other.clone()),
        },
        other => {
            return Err(AppError::BadRequest(format!(
                "field `{name}` has unsupported column type {other:?}"
            )));
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entity::{inventory_tickets, items, users};

    #[test]
    fn converts_by_column_type() {
        assert_eq!(
            json_to_value(&items::Column::CategoryId, &json!(4)).unwrap(),
            Value::from(4i32)
        );
        assert_eq!(
            json_to_value(&items::Column::WarningLimit, &json!(3)).unwrap(),
            Value::from(3.0f64)
        );
        assert_eq!(
            json_to_value(&users::Column::Status, &json!(false)).unwrap(),
            Value::from(false)
        );
        assert_eq!(
            json_to_value(&inventory_tickets::Column::ExpiredAt, &json!("2025-03-01")).unwrap(),
            Value::from(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert_eq!(
            json_to_value(&users::Column::WarehouseId, &JsonValue::Null).unwrap(),
            Value::Int(None)
        );
    }

    #[test]
    fn rejects_values_of_the_wrong_shape() {
        assert!(matches!(
            json_to_value(&items::Column::Name, &json!(12)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            json_to_value(&inventory_tickets::Column::ExpiredAt, &json!("tomorrow")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            json_to_value(&users::Column::Role, &json!(1.5)),
            Err(AppError::BadRequest(_))
        ));
    }
}
