//! Client side of the API: reads collections through a primary origin and
//! falls back to a secondary one when the primary is down or misbehaving.

use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    config::ClientConfig,
    entities::{event, news, team_member, Event, News, TeamMember},
};

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("tiempo de espera agotado")]
    Timeout,
    #[error("error de red: {0}")]
    Network(#[source] reqwest::Error),
    #[error("estado HTTP {0}")]
    Status(StatusCode),
    #[error("la respuesta no es JSON válido: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AttemptError::Timeout
        } else {
            AttemptError::Network(err)
        }
    }
}

/// Both origins failed. Carries the two URLs so callers can decide how to
/// degrade.
#[derive(Debug, Error)]
#[error("No se pudo obtener {primary} ({primary_cause}) ni el respaldo {fallback} ({fallback_cause})")]
pub struct FetchFailed {
    pub primary: String,
    pub fallback: String,
    pub primary_cause: AttemptError,
    pub fallback_cause: AttemptError,
}

#[derive(Debug, Clone)]
pub struct FallbackClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl FallbackClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Tries `primary`, then `fallback` only once the primary attempt has
    /// failed. A non-2xx status or a body that is not valid JSON counts as a
    /// failure just like a network error.
    pub async fn fetch_with_fallback<T: DeserializeOwned>(
        &self,
        primary: &str,
        fallback: &str,
    ) -> Result<T, FetchFailed> {
        let primary_cause = match self.attempt(primary).await {
            Ok(value) => {
                debug!(url = primary, "Datos obtenidos del origen principal");
                return Ok(value);
            }
            Err(err) => {
                warn!(url = primary, error = %err, "Origen principal falló; intentando respaldo");
                err
            }
        };

        match self.attempt(fallback).await {
            Ok(value) => {
                info!(url = fallback, "Datos obtenidos del origen de respaldo");
                Ok(value)
            }
            Err(fallback_cause) => {
                warn!(url = fallback, error = %fallback_cause, "Origen de respaldo falló");
                error!(
                    primary,
                    fallback,
                    primary_error = %primary_cause,
                    fallback_error = %fallback_cause,
                    "Ambos orígenes fallaron"
                );
                Err(FetchFailed {
                    primary: primary.to_string(),
                    fallback: fallback.to_string(),
                    primary_cause,
                    fallback_cause,
                })
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, url: &str) -> Result<T, AttemptError> {
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(AttemptError::Decode)
    }
}

/// Base URLs of the two origins serving the same API.
#[derive(Debug, Clone)]
pub struct Endpoints {
    primary_base: String,
    fallback_base: String,
}

impl Endpoints {
    pub fn new(primary_base: impl Into<String>, fallback_base: impl Into<String>) -> Self {
        Self {
            primary_base: primary_base.into(),
            fallback_base: fallback_base.into(),
        }
    }

    pub fn collection(&self, name: &str) -> (String, String) {
        (
            join_url(&self.primary_base, name),
            join_url(&self.fallback_base, name),
        )
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_matches('/'))
}

/// Typed access to the three collections, the way the site's pages load them.
#[derive(Debug, Clone)]
pub struct ChapterClient {
    client: FallbackClient,
    endpoints: Endpoints,
}

impl ChapterClient {
    pub fn new(client: FallbackClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            FallbackClient::new(config.timeout),
            Endpoints::new(&config.primary_base, &config.fallback_base),
        )
    }

    pub async fn collection<T: DeserializeOwned>(&self, name: &str) -> Result<T, FetchFailed> {
        let (primary, fallback) = self.endpoints.collection(name);
        self.client.fetch_with_fallback(&primary, &fallback).await
    }

    pub async fn events(&self) -> Result<Vec<Event>, FetchFailed> {
        self.collection(event::COLLECTION).await
    }

    pub async fn news(&self) -> Result<Vec<News>, FetchFailed> {
        self.collection(news::COLLECTION).await
    }

    pub async fn team_members(&self) -> Result<Vec<TeamMember>, FetchFailed> {
        self.collection(team_member::COLLECTION).await
    }
}

/// What a page renders: still waiting, data in hand, or nothing usable after
/// both origins failed.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> From<Result<T, FetchFailed>> for LoadState<T> {
    fn from(result: Result<T, FetchFailed>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => LoadState::Failed(err.to_string()),
        }
    }
}
