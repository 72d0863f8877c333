//! Servicio de mantenimiento (taller)
//!
//! Abrir un servicio pasa el vehículo a IN_SHOP; cerrarlo lo devuelve a
//! AVAILABLE. Ambos cambios pasan por `VehicleLifecycleService` dentro de la
//! misma transacción que el registro de mantenimiento.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::database::transaction::TransactionRunner;
use crate::models::{EntityKind, MaintenanceLog, VehicleStatus};
use crate::repositories::StoreTransaction;
use crate::services::vehicle_lifecycle::VehicleLifecycleService;
use crate::utils::errors::{not_found_error, AppResult, BusinessRule};

/// Datos para abrir un servicio de taller
#[derive(Debug, Clone)]
pub struct NewService {
    pub vehicle_id: Uuid,
    pub description: String,
    pub cost: Option<Decimal>,
    pub service_date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct MaintenanceService {
    runner: TransactionRunner,
}

impl MaintenanceService {
    pub fn new(runner: TransactionRunner) -> Self {
        Self { runner }
    }

    pub async fn add_service(&self, service: NewService) -> AppResult<MaintenanceLog> {
        let log = self
            .runner
            .run("add_maintenance_service", move |tx| {
                Box::pin(add_service_in(tx, service.clone(), Utc::now()))
            })
            .await?;
        info!(
            "🔧 Servicio {} abierto; vehículo {}: AVAILABLE -> IN_SHOP",
            log.id, log.vehicle_id
        );
        Ok(log)
    }

    /// Cerrar un servicio; `final_cost` reemplaza al coste registrado si se indica
    pub async fn complete_service(
        &self,
        log_id: Uuid,
        final_cost: Option<Decimal>,
    ) -> AppResult<MaintenanceLog> {
        let log = self
            .runner
            .run("complete_maintenance_service", move |tx| {
                Box::pin(complete_service_in(tx, log_id, final_cost, Utc::now()))
            })
            .await?;
        info!(
            "🔧 Servicio {} cerrado (coste {}); vehículo {} -> AVAILABLE",
            log.id, log.cost, log.vehicle_id
        );
        Ok(log)
    }
}

async fn add_service_in(
    tx: &mut dyn StoreTransaction,
    service: NewService,
    now: DateTime<Utc>,
) -> AppResult<MaintenanceLog> {
    let vehicle = tx
        .find_vehicle_for_update(service.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, service.vehicle_id))?;

    if vehicle.status != VehicleStatus::Available {
        return Err(BusinessRule::VehicleNotServiceable {
            vehicle_id: vehicle.id,
            status: vehicle.status,
        }
        .into());
    }

    VehicleLifecycleService::transition(tx, vehicle.id, VehicleStatus::InShop).await?;

    let log = MaintenanceLog::open(
        vehicle.id,
        service.description,
        service.cost.unwrap_or(Decimal::ZERO),
        service.service_date.unwrap_or(now),
    );
    tx.insert_maintenance_log(&log).await
}

async fn complete_service_in(
    tx: &mut dyn StoreTransaction,
    log_id: Uuid,
    final_cost: Option<Decimal>,
    now: DateTime<Utc>,
) -> AppResult<MaintenanceLog> {
    let mut log = tx
        .find_maintenance_log_for_update(log_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::MaintenanceLog, log_id))?;

    if log.is_completed {
        return Err(BusinessRule::MaintenanceAlreadyCompleted(log_id).into());
    }

    VehicleLifecycleService::transition(tx, log.vehicle_id, VehicleStatus::Available).await?;

    log.is_completed = true;
    log.completed_date = Some(now);
    if let Some(cost) = final_cost {
        log.cost = cost;
    }
    tx.update_maintenance_log(&log).await
}
