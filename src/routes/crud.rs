use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::{
    routes::{
        error::{ApiError, ApiResult},
        structs::DeleteResponse,
    },
    schema::Schema,
    state::AppState,
    store::document_to_json,
};

type Body = Result<Json<Value>, JsonRejection>;

/// The same five handlers for every collection; only the schema changes.
pub fn router(schema: Schema) -> Router<AppState> {
    let collection_path = format!("/api/{}", schema.collection);
    let record_path = format!("{collection_path}/:id");

    Router::new()
        .route(
            &collection_path,
            get(move |State(state): State<AppState>| list_records(state, schema)).post(
                move |State(state): State<AppState>, body: Body| create_record(state, schema, body),
            ),
        )
        .route(
            &record_path,
            get(move |State(state): State<AppState>, Path(id): Path<String>| {
                get_record(state, schema, id)
            })
            .put(
                move |State(state): State<AppState>, Path(id): Path<String>, body: Body| {
                    update_record(state, schema, id, body)
                },
            )
            .delete(move |State(state): State<AppState>, Path(id): Path<String>| {
                delete_record(state, schema, id)
            }),
        )
}

fn read_body(body: Body) -> ApiResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

async fn list_records(state: AppState, schema: Schema) -> ApiResult<Json<Vec<Value>>> {
    let documents = state.store.list(schema.collection, schema.sort_by).await?;
    Ok(Json(documents.into_iter().map(document_to_json).collect()))
}

async fn get_record(state: AppState, schema: Schema, id: String) -> ApiResult<Json<Value>> {
    state
        .store
        .find_by_id(schema.collection, &id)
        .await?
        .map(|document| Json(document_to_json(document)))
        .ok_or(ApiError::NotFound)
}

async fn create_record(
    state: AppState,
    schema: Schema,
    body: Body,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let document = schema.prepare_insert(&read_body(body)?, Utc::now())?;
    let stored = state.store.insert(schema.collection, document).await?;
    info!(collection = schema.collection, "Registro creado");
    Ok((StatusCode::CREATED, Json(document_to_json(stored))))
}

async fn update_record(
    state: AppState,
    schema: Schema,
    id: String,
    body: Body,
) -> ApiResult<Json<Value>> {
    let changes = schema.prepare_update(&read_body(body)?, Utc::now())?;
    let updated = state
        .store
        .update_by_id(schema.collection, &id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(collection = schema.collection, id = %id, "Registro actualizado");
    Ok(Json(document_to_json(updated)))
}

async fn delete_record(state: AppState, schema: Schema, id: String) -> ApiResult<Json<DeleteResponse>> {
    state
        .store
        .delete_by_id(schema.collection, &id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(collection = schema.collection, id = %id, "Registro eliminado");
    Ok(Json(DeleteResponse {
        message: "Registro eliminado correctamente".to_string(),
        id,
    }))
}
