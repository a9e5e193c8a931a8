use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gdg_chapter_api::{
    config::AppConfig,
    db::{ConnectionManager, MongoConnector},
    routes,
    state::AppState,
    store::MongoStore,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuración inválida: {err}");
            std::process::exit(1);
        }
    };

    let connections = Arc::new(ConnectionManager::new(
        MongoConnector::new(config.connect_timeout),
        config.mongo_uri.clone(),
    ));

    // Warm the cache; a failure here is retried lazily by the first request.
    if let Err(err) = connections.get().await {
        error!("MongoDB no disponible al arrancar: {err}");
    }

    let store = MongoStore::new(connections, config.db_name.clone());
    let state = AppState::new(Arc::new(store), config.admin_token.clone());
    let app = routes::app(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("No se pudo escuchar en {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!("API corriendo en http://{}/health", addr);

    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        error!("El servidor se detuvo con error: {err}");
        std::process::exit(1);
    }
}
