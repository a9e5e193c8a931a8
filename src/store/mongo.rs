use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::ErrorKind,
    options::ReturnDocument,
    Collection,
};
use tracing::{debug, error};

use crate::{
    db::{ConnectionManager, MongoConnector},
    schema::SortOrder,
    store::{DocumentStore, StoreError, StoreResult, ID_FIELD},
};

#[derive(Clone)]
pub struct MongoStore {
    connections: Arc<ConnectionManager<MongoConnector>>,
    db_name: String,
}

impl MongoStore {
    pub fn new(connections: Arc<ConnectionManager<MongoConnector>>, db_name: impl Into<String>) -> Self {
        Self {
            connections,
            db_name: db_name.into(),
        }
    }

    async fn collection(&self, name: &str) -> StoreResult<Collection<Document>> {
        let client = self.connections.get().await?;
        Ok(client.database(&self.db_name).collection::<Document>(name))
    }

    /// Maps a driver error, dropping the cached client when the server itself
    /// went away so the next request reconnects.
    async fn fail(&self, collection: &str, err: mongodb::error::Error) -> StoreError {
        error!(collection, error = %err, "Operación fallida en MongoDB");
        if matches!(*err.kind, ErrorKind::Io(_) | ErrorKind::ServerSelection { .. }) {
            self.connections.invalidate().await;
        }
        StoreError::Database(err.to_string())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list(&self, collection: &str, sort: (&str, SortOrder)) -> StoreResult<Vec<Document>> {
        let target = self.collection(collection).await?;
        let (field, order) = sort;
        let found = match target
            .find(doc! {})
            .sort(doc! { field: order.as_i32() })
            .await
        {
            Ok(cursor) => cursor.try_collect::<Vec<Document>>().await,
            Err(err) => Err(err),
        };
        match found {
            Ok(documents) => {
                debug!(collection, total = documents.len(), "Listado de documentos");
                Ok(documents)
            }
            Err(err) => Err(self.fail(collection, err).await),
        }
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let target = self.collection(collection).await?;
        match target.find_one(doc! { ID_FIELD: object_id }).await {
            Ok(found) => Ok(found),
            Err(err) => Err(self.fail(collection, err).await),
        }
    }

    async fn insert(&self, collection: &str, document: Document) -> StoreResult<Document> {
        let target = self.collection(collection).await?;
        match target.insert_one(&document).await {
            Ok(result) => {
                let mut stored = doc! { ID_FIELD: result.inserted_id };
                stored.extend(document);
                debug!(collection, "Documento insertado");
                Ok(stored)
            }
            Err(err) => Err(self.fail(collection, err).await),
        }
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StoreResult<Option<Document>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let target = self.collection(collection).await?;
        match target
            .find_one_and_update(doc! { ID_FIELD: object_id }, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
        {
            Ok(updated) => Ok(updated),
            Err(err) => Err(self.fail(collection, err).await),
        }
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let target = self.collection(collection).await?;
        match target.find_one_and_delete(doc! { ID_FIELD: object_id }).await {
            Ok(removed) => Ok(removed),
            Err(err) => Err(self.fail(collection, err).await),
        }
    }

    async fn is_connected(&self) -> bool {
        self.connections.is_connected().await
    }
}
