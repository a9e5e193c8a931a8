use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{Fallback, Field, FieldKind, Schema, SortOrder};

pub const COLLECTION: &str = "news";

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        Field::required("title", FieldKind::Text),
        Field::required("description", FieldKind::Text),
        Field::optional("type", FieldKind::Text),
        Field::optional("company", FieldKind::Text),
        Field::optional("location", FieldKind::Text),
        Field::optional("date", FieldKind::Timestamp).or(Fallback::Now),
    ],
    sort_by: ("date", SortOrder::Descending),
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}
