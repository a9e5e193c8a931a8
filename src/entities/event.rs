use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::{Fallback, Field, FieldKind, Schema, SortOrder};

pub const COLLECTION: &str = "events";
pub const STATUSES: &[&str] = &["upcoming", "ongoing", "past"];

pub const SCHEMA: Schema = Schema {
    collection: COLLECTION,
    fields: &[
        Field::required("title", FieldKind::Text),
        Field::required("date", FieldKind::Timestamp),
        Field::required("description", FieldKind::Text),
        Field::required("image", FieldKind::Text),
        Field::optional("link", FieldKind::Text),
        Field::optional("status", FieldKind::Choice(STATUSES)).or(Fallback::Value("upcoming")),
    ],
    sort_by: ("date", SortOrder::Descending),
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Past,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}
