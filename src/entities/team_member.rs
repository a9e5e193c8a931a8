use serde::{Deserialize, Serialize};

use crate::schema::{Field, FieldKind, Schema, SortOrder, CREATED_AT};

pub const COLLECTION: &str = "teammembers";

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        Field::required("name", FieldKind::Text),
        Field::required("role", FieldKind::Text),
        Field::optional("image", FieldKind::Text),
        Field::optional("linkedin", FieldKind::Text),
        Field::optional("twitter", FieldKind::Text),
        Field::optional("github", FieldKind::Text),
    ],
    sort_by: (CREATED_AT, SortOrder::Ascending),
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
}
