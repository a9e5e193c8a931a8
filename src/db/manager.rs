use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("URI de conexión inválida: {0}")]
    InvalidUri(String),
    #[error("No se pudo conectar con la base de documentos: {0}")]
    Unreachable(String),
}

/// Establishes connections to the document store. Implementations must be
/// cheap to share; the manager decides when `connect` is called.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Clone + Send + Sync + 'static;

    async fn connect(&self, uri: &str) -> Result<Self::Connection, ConnectionError>;
}

type Attempt<T> = Shared<BoxFuture<'static, Result<T, ConnectionError>>>;

struct Slot<T> {
    connection: Option<T>,
    attempt: Option<Attempt<T>>,
}

/// Process-wide handle to the document store.
///
/// The first `get` starts a connection attempt and parks it in the slot so
/// every concurrent caller awaits that same attempt. A resolved connection is
/// cached and handed out without I/O; a failed attempt is removed from the
/// slot so the next caller starts over.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    uri: String,
    slot: Mutex<Slot<C::Connection>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, uri: impl Into<String>) -> Self {
        Self {
            connector: Arc::new(connector),
            uri: uri.into(),
            slot: Mutex::new(Slot {
                connection: None,
                attempt: None,
            }),
        }
    }

    pub async fn get(&self) -> Result<C::Connection, ConnectionError> {
        let attempt = {
            let mut slot = self.slot.lock().await;
            if let Some(connection) = &slot.connection {
                return Ok(connection.clone());
            }
            match &slot.attempt {
                Some(pending) => pending.clone(),
                None => {
                    let connector = Arc::clone(&self.connector);
                    let uri = self.uri.clone();
                    let pending = async move { connector.connect(&uri).await }
                        .boxed()
                        .shared();
                    slot.attempt = Some(pending.clone());
                    pending
                }
            }
        };

        let result = attempt.clone().await;

        let mut slot = self.slot.lock().await;
        let is_current = slot
            .attempt
            .as_ref()
            .is_some_and(|pending| pending.ptr_eq(&attempt));
        if is_current {
            slot.attempt = None;
            match &result {
                Ok(connection) => {
                    info!("Conexión con la base de documentos establecida");
                    slot.connection = Some(connection.clone());
                }
                Err(err) => {
                    warn!(error = %err, "Falló la conexión; el siguiente intento empezará de cero");
                }
            }
        }

        result
    }

    /// Drops the cached connection. An attempt already in flight is left alone.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.connection.take().is_some() {
            warn!("Conexión en caché descartada");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.connection.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use futures::future::join_all;

    #[derive(Clone, Debug, PartialEq)]
    struct FakeConnection(usize);

    struct FakeConnector {
        calls: Arc<AtomicUsize>,
        failures: usize,
        delay: Duration,
    }

    impl FakeConnector {
        fn new(failures: usize, delay: Duration) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let connector = Self {
                calls: Arc::clone(&calls),
                failures,
                delay,
            };
            (connector, calls)
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        type Connection = FakeConnection;

        async fn connect(&self, uri: &str) -> Result<FakeConnection, ConnectionError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if call <= self.failures {
                Err(ConnectionError::Unreachable(format!("{uri} rechazó el intento {call}")))
            } else {
                Ok(FakeConnection(call))
            }
        }
    }

    #[tokio::test]
    async fn sequential_calls_reuse_one_connection() {
        let (connector, calls) = FakeConnector::new(0, Duration::ZERO);
        let manager = ConnectionManager::new(connector, "mongodb://fake");

        assert!(!manager.is_connected().await);
        for _ in 0..5 {
            assert_eq!(manager.get().await.unwrap(), FakeConnection(1));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn concurrent_callers_share_the_in_flight_attempt() {
        let (connector, calls) = FakeConnector::new(0, Duration::from_millis(50));
        let manager = Arc::new(ConnectionManager::new(connector, "mongodb://fake"));

        let callers = (0..8).map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.get().await })
        });
        let results = join_all(callers).await;

        for result in results {
            assert_eq!(result.unwrap().unwrap(), FakeConnection(1));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_attempt_is_cleared_and_retried_on_next_call() {
        let (connector, calls) = FakeConnector::new(1, Duration::ZERO);
        let manager = ConnectionManager::new(connector, "mongodb://fake");

        let err = manager.get().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Unreachable(_)));
        assert!(!manager.is_connected().await);

        assert_eq!(manager.get().await.unwrap(), FakeConnection(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_all_see_a_shared_failure() {
        let (connector, calls) = FakeConnector::new(1, Duration::from_millis(30));
        let manager = Arc::new(ConnectionManager::new(connector, "mongodb://fake"));

        let results = join_all((0..4).map(|_| manager.get())).await;
        assert!(results.iter().all(|result| result.is_err()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(manager.get().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_reconnect() {
        let (connector, calls) = FakeConnector::new(0, Duration::ZERO);
        let manager = ConnectionManager::new(connector, "mongodb://fake");

        manager.get().await.unwrap();
        manager.invalidate().await;
        assert!(!manager.is_connected().await);

        assert_eq!(manager.get().await.unwrap(), FakeConnection(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
