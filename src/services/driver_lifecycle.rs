//! Gestor del ciclo de vida de conductores
//!
//! Misma forma que el de vehículos. La suspensión se acepta desde cualquier
//! estado (ver `transition_validator`).

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::transaction::TransactionRunner;
use crate::models::{Driver, DriverStatus, EntityKind};
use crate::repositories::StoreTransaction;
use crate::services::transition_validator::LifecycleStatus;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct DriverLifecycleService {
    runner: TransactionRunner,
}

impl DriverLifecycleService {
    pub fn new(runner: TransactionRunner) -> Self {
        Self { runner }
    }

    /// Cambiar el estado de un conductor dentro del ámbito `tx`
    pub async fn transition(
        tx: &mut dyn StoreTransaction,
        driver_id: Uuid,
        new_status: DriverStatus,
    ) -> AppResult<Driver> {
        let (from, driver) = apply(tx, driver_id, new_status).await?;
        debug!("🧑‍✈️ Conductor {}: {} -> {} (pendiente de commit)", driver_id, from, driver.status);
        Ok(driver)
    }

    pub async fn update_status(&self, driver_id: Uuid, new_status: DriverStatus) -> AppResult<Driver> {
        let (from, driver) = self
            .runner
            .run("update_driver_status", move |tx| {
                Box::pin(apply(tx, driver_id, new_status))
            })
            .await?;
        if from != driver.status {
            info!("🧑‍✈️ Conductor {}: {} -> {}", driver_id, from, driver.status);
        }
        Ok(driver)
    }

    /// Suspender un conductor sin condiciones
    pub async fn suspend(&self, driver_id: Uuid) -> AppResult<Driver> {
        self.update_status(driver_id, DriverStatus::Suspended).await
    }
}

async fn apply(
    tx: &mut dyn StoreTransaction,
    driver_id: Uuid,
    new_status: DriverStatus,
) -> AppResult<(DriverStatus, Driver)> {
    let driver = tx
        .find_driver_for_update(driver_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Driver, driver_id))?;

    let from = driver.status;
    from.ensure_transition(new_status)?;
    if from == new_status {
        return Ok((from, driver));
    }

    Ok((from, tx.update_driver_status(driver_id, new_status).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::transaction::RetryPolicy;
    use crate::repositories::{FleetStore, MemoryFleetStore};
    use crate::utils::errors::AppError;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    async fn setup(status: DriverStatus) -> (MemoryFleetStore, DriverLifecycleService, Uuid) {
        let store = MemoryFleetStore::new();
        let driver = Driver::new("Camille", "LIC-42", Utc::now() + Duration::days(365))
            .with_status(status);
        let mut tx = store.begin().await.unwrap();
        tx.insert_driver(&driver).await.unwrap();
        tx.commit().await.unwrap();

        let runner = TransactionRunner::new(Arc::new(store.clone()), RetryPolicy::default());
        (store, DriverLifecycleService::new(runner), driver.id)
    }

    #[tokio::test]
    async fn test_suspend_from_every_status() {
        for status in DriverStatus::ALL {
            let (_store, service, id) = setup(status).await;
            let driver = service.suspend(id).await.unwrap();
            assert_eq!(driver.status, DriverStatus::Suspended);
        }
    }

    #[tokio::test]
    async fn test_off_duty_cannot_go_on_trip() {
        let (store, service, id) = setup(DriverStatus::OffDuty).await;
        let err = service.update_status(id, DriverStatus::OnTrip).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::StateTransitionRejected { entity: EntityKind::Driver, .. }
        ));

        let mut tx = store.begin().await.unwrap();
        let driver = tx.find_driver_for_update(id).await.unwrap().unwrap();
        assert_eq!(driver.status, DriverStatus::OffDuty);
    }

    #[tokio::test]
    async fn test_reinstate_suspended_driver() {
        let (_store, service, id) = setup(DriverStatus::Suspended).await;
        let driver = service.update_status(id, DriverStatus::OnDuty).await.unwrap();
        assert_eq!(driver.status, DriverStatus::OnDuty);
    }
}
