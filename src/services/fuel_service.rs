//! Servicio de repostajes
//!
//! Registra un repostaje dentro de una transacción que bloquea la fila del
//! vehículo, de modo que dos registros simultáneos del mismo vehículo comparan
//! su odómetro contra el último ya confirmado.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::database::transaction::TransactionRunner;
use crate::models::{EntityKind, FuelLog, NewFuelLog};
use crate::repositories::StoreTransaction;
use crate::utils::errors::{not_found_error, AppResult, BusinessRule};

#[derive(Clone)]
pub struct FuelService {
    runner: TransactionRunner,
}

impl FuelService {
    pub fn new(runner: TransactionRunner) -> Self {
        Self { runner }
    }

    /// Registrar un repostaje; el odómetro nunca retrocede
    pub async fn add_fuel_log(&self, new_log: NewFuelLog) -> AppResult<FuelLog> {
        let log = self
            .runner
            .run("add_fuel_log", move |tx| {
                Box::pin(add_fuel_log_in(tx, new_log.clone(), Utc::now()))
            })
            .await?;
        info!(
            "⛽ Repostaje {} registrado para vehículo {} ({} gal)",
            log.id, log.vehicle_id, log.gallons
        );
        Ok(log)
    }
}

async fn add_fuel_log_in(
    tx: &mut dyn StoreTransaction,
    new_log: NewFuelLog,
    now: DateTime<Utc>,
) -> AppResult<FuelLog> {
    let vehicle = tx
        .find_vehicle_for_update(new_log.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, new_log.vehicle_id))?;

    if let Some(reading) = new_log.odometer {
        let previous = tx
            .latest_fuel_log_for_vehicle(vehicle.id)
            .await?
            .and_then(|log| log.odometer);
        if let Some(previous) = previous {
            if reading < previous {
                return Err(BusinessRule::OdometerRollback {
                    vehicle_id: vehicle.id,
                    reading,
                    previous,
                }
                .into());
            }
        }
    }

    tx.insert_fuel_log(&FuelLog::record(new_log, now)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::transaction::RetryPolicy;
    use crate::models::Vehicle;
    use crate::repositories::{FleetStore, MemoryFleetStore};
    use crate::utils::errors::AppError;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn setup() -> (FuelService, Uuid) {
        let store = MemoryFleetStore::new();
        let vehicle = Vehicle::new("CA-512-RB", Decimal::from(3500));
        let mut tx = store.begin().await.unwrap();
        tx.insert_vehicle(&vehicle).await.unwrap();
        tx.commit().await.unwrap();

        let runner = TransactionRunner::new(Arc::new(store), RetryPolicy::default());
        (FuelService::new(runner), vehicle.id)
    }

    fn fill_up(vehicle_id: Uuid, odometer: Option<i64>) -> NewFuelLog {
        NewFuelLog {
            vehicle_id,
            gallons: Decimal::from(10),
            cost: Decimal::from(40),
            odometer: odometer.map(Decimal::from),
            location: Some("Aire de Montélimar".to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_fuel_log_is_accepted() {
        let (service, vehicle_id) = setup().await;
        let log = service.add_fuel_log(fill_up(vehicle_id, Some(10))).await.unwrap();
        assert_eq!(log.vehicle_id, vehicle_id);
        assert_eq!(log.odometer, Some(Decimal::from(10)));
    }

    #[tokio::test]
    async fn test_odometer_may_increase_or_stay() {
        let (service, vehicle_id) = setup().await;
        service.add_fuel_log(fill_up(vehicle_id, Some(50_000))).await.unwrap();
        service.add_fuel_log(fill_up(vehicle_id, Some(50_000))).await.unwrap();
        let log = service.add_fuel_log(fill_up(vehicle_id, Some(50_100))).await.unwrap();
        assert_eq!(log.odometer, Some(Decimal::from(50_100)));
    }

    #[tokio::test]
    async fn test_odometer_rollback_is_rejected() {
        let (service, vehicle_id) = setup().await;
        service.add_fuel_log(fill_up(vehicle_id, Some(50_000))).await.unwrap();

        let err = service
            .add_fuel_log(fill_up(vehicle_id, Some(45_000)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ValidationFailed(BusinessRule::OdometerRollback { .. })
        ));
        assert_eq!(err.business_rule().map(|r| r.code()), Some("ODOMETER_ROLLBACK"));
    }

    #[tokio::test]
    async fn test_log_without_odometer_skips_the_check() {
        let (service, vehicle_id) = setup().await;
        service.add_fuel_log(fill_up(vehicle_id, Some(50_000))).await.unwrap();
        service.add_fuel_log(fill_up(vehicle_id, None)).await.unwrap();

        // El registro sin lectura no cuenta como referencia
        let err = service
            .add_fuel_log(fill_up(vehicle_id, Some(49_999)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::ValidationFailed(BusinessRule::OdometerRollback { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_vehicle_is_not_found() {
        let (service, _vehicle_id) = setup().await;
        let err = service
            .add_fuel_log(fill_up(Uuid::new_v4(), Some(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
