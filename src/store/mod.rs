use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde_json::Value;
use thiserror::Error;

use crate::{db::ConnectionError, schema::SortOrder};

#[cfg(test)]
pub mod memory;
pub mod mongo;

pub use mongo::MongoStore;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("Error en la base de documentos: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over flat, unrelated collections. Ids are ObjectId hex strings; an id
/// that does not parse simply matches nothing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: &str, sort: (&str, SortOrder)) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document>;

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>>;

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    async fn is_connected(&self) -> bool;
}

/// Renders a stored document the way API consumers expect it: ids as hex
/// strings and dates as RFC 3339.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => date
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(date.timestamp_millis())),
        Bson::Document(inner) => document_to_json(inner),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};
    use serde_json::json;

    #[test]
    fn documents_render_with_plain_ids_and_dates() {
        let id = ObjectId::parse_str("65f1c0ffee0000000000abcd").unwrap();
        let document = doc! {
            "_id": id,
            "title": "Meetup",
            "date": DateTime::from_millis(0),
            "link": null,
            "tags": ["android", "web"]
        };

        assert_eq!(
            document_to_json(document),
            json!({
                "_id": "65f1c0ffee0000000000abcd",
                "title": "Meetup",
                "date": "1970-01-01T00:00:00Z",
                "link": null,
                "tags": ["android", "web"]
            })
        );
    }
}
