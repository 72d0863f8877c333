//! Gestor del ciclo de vida de vehículos
//!
//! Secuencia leer-validar-escribir del estado de un vehículo. `transition`
//! trabaja dentro de un ámbito ya abierto (composición desde el coordinador
//! de viajes o el taller); `update_status` abre su propio ámbito para las
//! ediciones administrativas directas.

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::transaction::TransactionRunner;
use crate::models::{EntityKind, Vehicle, VehicleStatus};
use crate::repositories::StoreTransaction;
use crate::services::transition_validator::LifecycleStatus;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct VehicleLifecycleService {
    runner: TransactionRunner,
}

impl VehicleLifecycleService {
    pub fn new(runner: TransactionRunner) -> Self {
        Self { runner }
    }

    /// Cambiar el estado de un vehículo dentro del ámbito `tx`.
    ///
    /// Si la transición no es legal no se escribe nada. El log de nivel info lo
    /// emite quien confirma el ámbito.
    pub async fn transition(
        tx: &mut dyn StoreTransaction,
        vehicle_id: Uuid,
        new_status: VehicleStatus,
    ) -> AppResult<Vehicle> {
        let (from, vehicle) = apply(tx, vehicle_id, new_status).await?;
        debug!("🚗 Vehículo {}: {} -> {} (pendiente de commit)", vehicle_id, from, vehicle.status);
        Ok(vehicle)
    }

    /// Cambio administrativo de estado en su propia transacción
    pub async fn update_status(&self, vehicle_id: Uuid, new_status: VehicleStatus) -> AppResult<Vehicle> {
        let (from, vehicle) = self
            .runner
            .run("update_vehicle_status", move |tx| {
                Box::pin(apply(tx, vehicle_id, new_status))
            })
            .await?;
        if from != vehicle.status {
            info!("🚗 Vehículo {}: {} -> {}", vehicle_id, from, vehicle.status);
        }
        Ok(vehicle)
    }

    /// Retirar un vehículo (irreversible)
    pub async fn retire(&self, vehicle_id: Uuid) -> AppResult<Vehicle> {
        self.update_status(vehicle_id, VehicleStatus::Retired).await
    }
}

/// Leer, validar y escribir; devuelve el estado previo junto al vehículo
async fn apply(
    tx: &mut dyn StoreTransaction,
    vehicle_id: Uuid,
    new_status: VehicleStatus,
) -> AppResult<(VehicleStatus, Vehicle)> {
    let vehicle = tx
        .find_vehicle_for_update(vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, vehicle_id))?;

    let from = vehicle.status;
    from.ensure_transition(new_status)?;
    if from == new_status {
        return Ok((from, vehicle));
    }

    Ok((from, tx.update_vehicle_status(vehicle_id, new_status).await?))
}
