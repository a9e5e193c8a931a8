use std::process::ExitCode;

use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gdg_chapter_api::{
    client::{ChapterClient, LoadState},
    config::ClientConfig,
    entities::SCHEMAS,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let known: Vec<&str> = SCHEMAS.iter().map(|schema| schema.collection).collect();
    let Some(collection) = std::env::args().nth(1).filter(|name| known.contains(&name.as_str()))
    else {
        eprintln!("Uso: gdg-fetch <{}>", known.join("|"));
        return ExitCode::from(2);
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuración inválida: {err}");
            return ExitCode::FAILURE;
        }
    };

    let client = ChapterClient::from_config(&config);
    let mut state = LoadState::Loading;
    info!(collection = %collection, estado = ?state, "Cargando colección");
    state = client.collection::<Value>(&collection).await.into();

    match state {
        LoadState::Loaded(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("No se pudo serializar la respuesta: {err}");
                ExitCode::FAILURE
            }
        },
        LoadState::Failed(reason) => {
            error!("{reason}");
            ExitCode::FAILURE
        }
        LoadState::Loading => ExitCode::FAILURE,
    }
}
