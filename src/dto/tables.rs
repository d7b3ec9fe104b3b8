use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Payload, Record};

/// Row fields keyed by column name.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RowPayload(pub Payload);

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RowData(pub Record);

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordList {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Record>,
}
