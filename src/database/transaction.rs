//! Guardián de concurrencia
//!
//! `TransactionRunner` ejecuta una unidad de trabajo dentro de un ámbito
//! transaccional del `FleetStore`: commit si termina bien, rollback si falla.
//! Un fallo de serialización, deadlock o timeout de lock (de la unidad o del
//! commit) se reintenta con un ámbito nuevo hasta `max_retries` veces; agotados
//! los reintentos se devuelve `ConcurrencyConflict`. Ningún otro error se
//! reintenta.

use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::repositories::{FleetStore, StoreTransaction};
use crate::utils::errors::{AppError, AppResult};

/// Política de reintentos ante conflictos de concurrencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 1 }
    }
}

#[derive(Clone)]
pub struct TransactionRunner {
    store: Arc<dyn FleetStore>,
    policy: RetryPolicy,
}

impl TransactionRunner {
    pub fn new(store: Arc<dyn FleetStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Ejecutar `work` de forma atómica.
    ///
    /// `work` puede invocarse más de una vez (una por intento), así que debe
    /// construir su futuro a partir de datos propios y del ámbito recibido.
    pub async fn run<T, F>(&self, operation: &'static str, mut work: F) -> AppResult<T>
    where
        T: Send,
        F: for<'tx> FnMut(&'tx mut dyn StoreTransaction) -> BoxFuture<'tx, AppResult<T>> + Send,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.run_once(&mut work).await {
                Err(err) if err.is_concurrency_conflict() => {
                    if attempt > self.policy.max_retries {
                        warn!(
                            "⚠️ {} abortado por conflicto tras {} intento(s): {}",
                            operation, attempt, err
                        );
                        return Err(AppError::ConcurrencyConflict(format!(
                            "{} aborted after {} attempt(s): {}",
                            operation, attempt, err
                        )));
                    }
                    warn!(
                        "🔁 Conflicto de concurrencia en {} (intento {}), reintentando: {}",
                        operation, attempt, err
                    );
                }
                other => return other,
            }
        }
    }

    async fn run_once<T, F>(&self, work: &mut F) -> AppResult<T>
    where
        T: Send,
        F: for<'tx> FnMut(&'tx mut dyn StoreTransaction) -> BoxFuture<'tx, AppResult<T>> + Send,
    {
        let mut tx = self.store.begin().await?;
        match work(tx.as_mut()).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("⚠️ Error revirtiendo transacción: {}", rollback_err);
                }
                debug!("↩️ Unidad de trabajo revertida: {}", err);
                Err(err)
            }
        }
    }
}
