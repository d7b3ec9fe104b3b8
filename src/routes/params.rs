use serde::Deserialize;
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

use crate::models::SortOrder;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Column to order by; store order when absent.
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FieldQuery {
    pub field: String,
    /// Taken verbatim for text columns; otherwise parsed as JSON when
    /// possible (`3`, `true`) and taken as text when not.
    pub value: String,
}

impl FieldQuery {
    pub fn json_value(&self, text_column: bool) -> JsonValue {
        if text_column {
            return JsonValue::String(self.value.clone());
        }
        serde_json::from_str(&self.value).unwrap_or_else(|_| JsonValue::String(self.value.clone()))
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Name prefix, case-sensitive.
    #[serde(default)]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(value: &str) -> FieldQuery {
        FieldQuery {
            field: "name".into(),
            value: value.into(),
        }
    }

    #[test]
    fn field_values_parse_as_json_then_text() {
        assert_eq!(query("3").json_value(false), json!(3));
        assert_eq!(query("false").json_value(false), json!(false));
        assert_eq!(query("Bolt Extra").json_value(false), json!("Bolt Extra"));
        assert_eq!(query("\"3\"").json_value(false), json!("3"));
    }

    #[test]
    fn text_columns_take_the_value_verbatim() {
        assert_eq!(query("2024").json_value(true), json!("2024"));
        assert_eq!(query("true").json_value(true), json!("true"));
        assert_eq!(query("Bolt").json_value(true), json!("Bolt"));
    }
}
