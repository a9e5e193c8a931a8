use std::time::Duration;

use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client};
use tracing::debug;

use crate::db::manager::{ConnectionError, Connector};

pub const APP_NAME: &str = "gdg-chapter-api";

#[derive(Debug, Clone)]
pub struct MongoConnector {
    timeout: Duration,
}

impl MongoConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Connection = Client;

    async fn connect(&self, uri: &str) -> Result<Client, ConnectionError> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|err| ConnectionError::InvalidUri(err.to_string()))?;
        options.server_selection_timeout = Some(self.timeout);
        options.connect_timeout = Some(self.timeout);
        if options.app_name.is_none() {
            options.app_name = Some(APP_NAME.to_string());
        }

        let client = Client::with_options(options)
            .map_err(|err| ConnectionError::Unreachable(err.to_string()))?;

        // The driver connects lazily; ping so failures surface here.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| ConnectionError::Unreachable(err.to_string()))?;
        debug!(timeout_secs = self.timeout.as_secs(), "Ping a MongoDB exitoso");

        Ok(client)
    }
}
