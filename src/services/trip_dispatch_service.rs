//! Coordinador de despacho de viajes
//!
//! Orquesta los verbos públicos sobre un viaje (crear, despachar, iniciar,
//! completar, cancelar). Cada verbo es una única transacción que lee el viaje,
//! su vehículo y su conductor con lock de fila, valida y escribe los tres
//! cambios de estado juntos. O se confirman todos o ninguno.
//!
//! Orden de locks: viaje, vehículo, conductor. Todas las operaciones lo
//! respetan para que dos despachos concurrentes se serialicen en lugar de
//! bloquearse mutuamente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::transaction::TransactionRunner;
use crate::models::{
    DriverStatus, EntityKind, NewTrip, Trip, TripStatus, VehicleStatus,
};
use crate::repositories::StoreTransaction;
use crate::services::driver_lifecycle::DriverLifecycleService;
use crate::services::transition_validator::LifecycleStatus;
use crate::services::vehicle_lifecycle::VehicleLifecycleService;
use crate::utils::errors::{not_found_error, AppResult, BusinessRule};

#[derive(Clone)]
pub struct TripDispatchService {
    runner: TransactionRunner,
}

impl TripDispatchService {
    pub fn new(runner: TransactionRunner) -> Self {
        Self { runner }
    }

    /// Crear un viaje en DRAFT. No modifica vehículo ni conductor.
    pub async fn create_trip(&self, new_trip: NewTrip) -> AppResult<Trip> {
        let trip = self
            .runner
            .run("create_trip", move |tx| {
                Box::pin(create_in(tx, new_trip.clone(), Utc::now()))
            })
            .await?;
        info!("📝 Viaje {} creado en DRAFT", trip.id);
        Ok(trip)
    }

    /// Despachar un viaje: vehículo y conductor pasan a ON_TRIP y el viaje a
    /// DISPATCHED, de forma atómica.
    pub async fn dispatch_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let (from, trip) = self
            .runner
            .run("dispatch_trip", move |tx| {
                Box::pin(dispatch_in(tx, trip_id, Utc::now()))
            })
            .await?;
        log_committed("🚚", from, &trip);
        Ok(trip)
    }

    /// Marcar un viaje despachado como en tránsito
    pub async fn start_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let (from, trip) = self
            .runner
            .run("start_trip", move |tx| Box::pin(start_in(tx, trip_id, Utc::now())))
            .await?;
        log_committed("🛣️", from, &trip);
        Ok(trip)
    }

    /// Completar un viaje registrando la distancia recorrida y liberando recursos
    pub async fn complete_trip(&self, trip_id: Uuid, distance_km: Decimal) -> AppResult<Trip> {
        let (from, trip) = self
            .runner
            .run("complete_trip", move |tx| {
                Box::pin(complete_in(tx, trip_id, distance_km, Utc::now()))
            })
            .await?;
        log_committed("✅", from, &trip);
        Ok(trip)
    }

    /// Cancelar un viaje; sólo libera recursos si el viaje los retenía
    pub async fn cancel_trip(&self, trip_id: Uuid) -> AppResult<Trip> {
        let (from, trip) = self
            .runner
            .run("cancel_trip", move |tx| Box::pin(cancel_in(tx, trip_id, Utc::now())))
            .await?;
        log_committed("🛑", from, &trip);
        Ok(trip)
    }
}

/// Estado previo del viaje junto al viaje ya escrito
type Transitioned = (TripStatus, Trip);

fn log_committed(icon: &str, from: TripStatus, trip: &Trip) {
    if from == trip.status {
        debug!("Viaje {} ya estaba {}", trip.id, trip.status);
    } else {
        info!(
            "{} Viaje {}: {} -> {} (vehículo {}, conductor {})",
            icon, trip.id, from, trip.status, trip.vehicle_id, trip.driver_id
        );
    }
}

async fn load_trip(tx: &mut dyn StoreTransaction, trip_id: Uuid) -> AppResult<Trip> {
    tx.find_trip_for_update(trip_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Trip, trip_id))
}

async fn create_in(
    tx: &mut dyn StoreTransaction,
    new_trip: NewTrip,
    now: DateTime<Utc>,
) -> AppResult<Trip> {
    let vehicle = tx
        .find_vehicle_for_update(new_trip.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, new_trip.vehicle_id))?;
    tx.find_driver_for_update(new_trip.driver_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Driver, new_trip.driver_id))?;

    if new_trip.cargo_weight <= Decimal::ZERO {
        return Err(BusinessRule::NonPositiveCargo(new_trip.cargo_weight).into());
    }
    if !vehicle.can_carry(new_trip.cargo_weight) {
        return Err(BusinessRule::CargoExceedsCapacity {
            cargo_weight: new_trip.cargo_weight,
            capacity: vehicle.capacity_kg,
        }
        .into());
    }

    tx.insert_trip(&Trip::draft(new_trip, now)).await
}

async fn dispatch_in(
    tx: &mut dyn StoreTransaction,
    trip_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Transitioned> {
    let mut trip = load_trip(tx, trip_id).await?;
    let from = trip.status;
    from.ensure_transition(TripStatus::Dispatched)?;
    if from == TripStatus::Dispatched {
        return Ok((from, trip));
    }

    let vehicle = tx
        .find_vehicle_for_update(trip.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, trip.vehicle_id))?;
    let driver = tx
        .find_driver_for_update(trip.driver_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Driver, trip.driver_id))?;

    if vehicle.status != VehicleStatus::Available {
        return Err(BusinessRule::VehicleNotAvailable {
            vehicle_id: vehicle.id,
            status: vehicle.status,
        }
        .into());
    }
    // Una edición administrativa puede dejar AVAILABLE un vehículo aún en viaje
    let vehicle_trips = tx
        .count_active_trips_for_vehicle(vehicle.id, trip.id, &TripStatus::ACTIVE)
        .await?;
    if vehicle_trips > 0 {
        return Err(BusinessRule::VehicleNotAvailable {
            vehicle_id: vehicle.id,
            status: vehicle.status,
        }
        .into());
    }
    if driver.status != DriverStatus::OnDuty {
        return Err(BusinessRule::DriverNotOnDuty {
            driver_id: driver.id,
            status: driver.status,
        }
        .into());
    }

    // El estado del conductor no dice con qué viaje está ocupado
    let active_trips = tx
        .count_active_trips_for_driver(driver.id, trip.id, &TripStatus::ACTIVE)
        .await?;
    if active_trips > 0 {
        return Err(BusinessRule::DriverHasActiveTrip {
            driver_id: driver.id,
            active_trips,
        }
        .into());
    }

    if !driver.license_usable_at(now) {
        return Err(BusinessRule::LicenseInvalid { driver_id: driver.id }.into());
    }
    // La capacidad pudo cambiar desde la creación
    if !vehicle.can_carry(trip.cargo_weight) {
        return Err(BusinessRule::CargoExceedsCapacity {
            cargo_weight: trip.cargo_weight,
            capacity: vehicle.capacity_kg,
        }
        .into());
    }

    VehicleLifecycleService::transition(tx, vehicle.id, VehicleStatus::OnTrip).await?;
    DriverLifecycleService::transition(tx, driver.id, DriverStatus::OnTrip).await?;

    trip.status = TripStatus::Dispatched;
    trip.dispatched_at = Some(now);
    Ok((from, tx.update_trip(&trip).await?))
}

async fn start_in(
    tx: &mut dyn StoreTransaction,
    trip_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Transitioned> {
    let mut trip = load_trip(tx, trip_id).await?;
    let from = trip.status;
    from.ensure_transition(TripStatus::OnTrip)?;
    if from == TripStatus::OnTrip {
        return Ok((from, trip));
    }

    trip.status = TripStatus::OnTrip;
    trip.started_at = Some(now);
    Ok((from, tx.update_trip(&trip).await?))
}

async fn complete_in(
    tx: &mut dyn StoreTransaction,
    trip_id: Uuid,
    distance_km: Decimal,
    now: DateTime<Utc>,
) -> AppResult<Transitioned> {
    let mut trip = load_trip(tx, trip_id).await?;
    let from = trip.status;
    from.ensure_transition(TripStatus::Completed)?;
    if from == TripStatus::Completed {
        return Ok((from, trip));
    }
    if distance_km <= Decimal::ZERO {
        return Err(BusinessRule::NonPositiveDistance(distance_km).into());
    }

    release_resources(tx, &trip).await?;

    trip.status = TripStatus::Completed;
    trip.distance_km = Some(distance_km);
    trip.ended_at = Some(now);
    Ok((from, tx.update_trip(&trip).await?))
}

async fn cancel_in(
    tx: &mut dyn StoreTransaction,
    trip_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Transitioned> {
    let mut trip = load_trip(tx, trip_id).await?;
    let from = trip.status;
    from.ensure_transition(TripStatus::Cancelled)?;
    if from == TripStatus::Cancelled {
        return Ok((from, trip));
    }

    // Un viaje en DRAFT nunca tomó sus recursos
    if from.holds_resources() {
        release_resources(tx, &trip).await?;
    }

    trip.status = TripStatus::Cancelled;
    trip.ended_at = Some(now);
    Ok((from, tx.update_trip(&trip).await?))
}

/// Devolver vehículo y conductor a sus estados libres si siguen ocupados y
/// ningún otro viaje activo los referencia.
///
/// Un vehículo retirado o un conductor suspendido durante el viaje conservan
/// ese estado.
async fn release_resources(tx: &mut dyn StoreTransaction, trip: &Trip) -> AppResult<()> {
    let vehicle = tx
        .find_vehicle_for_update(trip.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, trip.vehicle_id))?;
    let vehicle_trips = tx
        .count_active_trips_for_vehicle(vehicle.id, trip.id, &TripStatus::ACTIVE)
        .await?;
    if vehicle.status == VehicleStatus::OnTrip && vehicle_trips == 0 {
        VehicleLifecycleService::transition(tx, vehicle.id, VehicleStatus::Available).await?;
    } else {
        debug!(
            "Vehículo {} no se libera: está {} con {} viaje(s) activo(s) más",
            vehicle.id, vehicle.status, vehicle_trips
        );
    }

    let driver = tx
        .find_driver_for_update(trip.driver_id)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Driver, trip.driver_id))?;
    let driver_trips = tx
        .count_active_trips_for_driver(driver.id, trip.id, &TripStatus::ACTIVE)
        .await?;
    if driver.status == DriverStatus::OnTrip && driver_trips == 0 {
        DriverLifecycleService::transition(tx, driver.id, DriverStatus::OnDuty).await?;
    } else {
        debug!(
            "Conductor {} no se libera: está {} con {} viaje(s) activo(s) más",
            driver.id, driver.status, driver_trips
        );
    }

    Ok(())
}
