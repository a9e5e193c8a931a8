use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod crud;
pub mod error;
pub mod health;
pub mod structs;

use crate::{auth, entities::SCHEMAS, state::AppState};

pub fn public_router() -> Router<AppState> {
    Router::new().merge(health::router())
}

pub fn api_router() -> Router<AppState> {
    SCHEMAS
        .into_iter()
        .fold(Router::new(), |router, schema| router.merge(crud::router(schema)))
}

pub fn app(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), auth::require_token);

    Router::new()
        .merge(public_router())
        .merge(api_router().route_layer(auth_layer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
