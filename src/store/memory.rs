use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use tokio::sync::Mutex;

use crate::{
    db::ConnectionError,
    schema::SortOrder,
    store::{DocumentStore, StoreError, StoreResult, ID_FIELD},
};

/// In-process stand-in for MongoDB used by route tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails as if the server were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.unreachable {
            Err(StoreError::Connection(ConnectionError::Unreachable(
                "servidor fuera de línea".into(),
            )))
        } else {
            Ok(())
        }
    }
}

fn matches_id(document: &Document, id: &str) -> bool {
    document
        .get_object_id(ID_FIELD)
        .map(|value| value.to_hex() == id)
        .unwrap_or(false)
}

fn compare(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    match (left, right) {
        (Some(Bson::DateTime(a)), Some(Bson::DateTime(b))) => a.cmp(b),
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str, sort: (&str, SortOrder)) -> StoreResult<Vec<Document>> {
        self.check()?;
        let collections = self.collections.lock().await;
        let mut documents = collections.get(collection).cloned().unwrap_or_default();
        let (field, order) = sort;
        documents.sort_by(|a, b| {
            let ordering = compare(a.get(field), b.get(field));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        Ok(documents)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check()?;
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| matches_id(document, id)))
            .cloned())
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document> {
        self.check()?;
        let mut stored = doc! { ID_FIELD: ObjectId::new() };
        stored.extend(document);
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>> {
        self.check()?;
        let mut collections = self.collections.lock().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| matches_id(document, id)))
        else {
            return Ok(None);
        };
        document.extend(changes);
        Ok(Some(document.clone()))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check()?;
        let mut collections = self.collections.lock().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(None);
        };
        Ok(documents
            .iter()
            .position(|document| matches_id(document, id))
            .map(|index| documents.remove(index)))
    }

    async fn is_connected(&self) -> bool {
        !self.unreachable
    }
}
