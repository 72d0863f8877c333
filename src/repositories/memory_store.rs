//! Almacén en memoria
//!
//! Cada ámbito toma el lock exclusivo de las tablas durante toda su vida y
//! trabaja sobre una copia que sólo reemplaza a las tablas en `commit`.
//! Las transacciones quedan serializadas y son todo-o-nada.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use super::{FleetStore, StoreTransaction};
use crate::models::{
    Driver, DriverStatus, EntityKind, FuelLog, MaintenanceLog, Trip, TripStatus, Vehicle, VehicleStatus,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct FleetTables {
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,
    trips: HashMap<Uuid, Trip>,
    maintenance_logs: HashMap<Uuid, MaintenanceLog>,
    fuel_logs: HashMap<Uuid, FuelLog>,
}

/// Almacén de flota en proceso, para tests y `STORAGE_BACKEND=memory`
#[derive(Clone, Default)]
pub struct MemoryFleetStore {
    tables: Arc<Mutex<FleetTables>>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<FleetTables>,
    working: FleetTables,
}

fn insert_unique<T: Clone>(
    table: &mut HashMap<Uuid, T>,
    entity: EntityKind,
    id: Uuid,
    row: &T,
) -> AppResult<T> {
    if table.contains_key(&id) {
        return Err(AppError::Internal(format!("{} with id '{}' already exists", entity, id)));
    }
    table.insert(id, row.clone());
    Ok(row.clone())
}

impl MemoryTransaction {
    fn count_trips(
        &self,
        belongs: impl Fn(&Trip) -> bool,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> i64 {
        self.working
            .trips
            .values()
            .filter(|trip| belongs(trip) && trip.id != excluding_trip && statuses.contains(&trip.status))
            .count() as i64
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.working.vehicles.get(&id).cloned())
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        insert_unique(&mut self.working.vehicles, EntityKind::Vehicle, vehicle.id, vehicle)
    }

    async fn update_vehicle_status(&mut self, id: Uuid, status: VehicleStatus) -> AppResult<Vehicle> {
        let vehicle = self
            .working
            .vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error(EntityKind::Vehicle, id))?;
        vehicle.status = status;
        Ok(vehicle.clone())
    }

    async fn find_driver_for_update(&mut self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.working.drivers.get(&id).cloned())
    }

    async fn insert_driver(&mut self, driver: &Driver) -> AppResult<Driver> {
        insert_unique(&mut self.working.drivers, EntityKind::Driver, driver.id, driver)
    }

    async fn update_driver_status(&mut self, id: Uuid, status: DriverStatus) -> AppResult<Driver> {
        let driver = self
            .working
            .drivers
            .get_mut(&id)
            .ok_or_else(|| not_found_error(EntityKind::Driver, id))?;
        driver.status = status;
        Ok(driver.clone())
    }

    async fn find_trip_for_update(&mut self, id: Uuid) -> AppResult<Option<Trip>> {
        Ok(self.working.trips.get(&id).cloned())
    }

    async fn insert_trip(&mut self, trip: &Trip) -> AppResult<Trip> {
        insert_unique(&mut self.working.trips, EntityKind::Trip, trip.id, trip)
    }

    async fn update_trip(&mut self, trip: &Trip) -> AppResult<Trip> {
        let stored = self
            .working
            .trips
            .get_mut(&trip.id)
            .ok_or_else(|| not_found_error(EntityKind::Trip, trip.id))?;
        stored.status = trip.status;
        stored.distance_km = trip.distance_km;
        stored.dispatched_at = trip.dispatched_at;
        stored.started_at = trip.started_at;
        stored.ended_at = trip.ended_at;
        Ok(stored.clone())
    }

    async fn count_active_trips_for_driver(
        &mut self,
        driver_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64> {
        Ok(self.count_trips(|trip| trip.driver_id == driver_id, excluding_trip, statuses))
    }

    async fn count_active_trips_for_vehicle(
        &mut self,
        vehicle_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64> {
        Ok(self.count_trips(|trip| trip.vehicle_id == vehicle_id, excluding_trip, statuses))
    }

    async fn find_maintenance_log_for_update(&mut self, id: Uuid) -> AppResult<Option<MaintenanceLog>> {
        Ok(self.working.maintenance_logs.get(&id).cloned())
    }

    async fn insert_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog> {
        insert_unique(&mut self.working.maintenance_logs, EntityKind::MaintenanceLog, log.id, log)
    }

    async fn update_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog> {
        let stored = self
            .working
            .maintenance_logs
            .get_mut(&log.id)
            .ok_or_else(|| not_found_error(EntityKind::MaintenanceLog, log.id))?;
        stored.cost = log.cost;
        stored.is_completed = log.is_completed;
        stored.completed_date = log.completed_date;
        Ok(stored.clone())
    }

    async fn insert_fuel_log(&mut self, log: &FuelLog) -> AppResult<FuelLog> {
        insert_unique(&mut self.working.fuel_logs, EntityKind::FuelLog, log.id, log)
    }

    async fn latest_fuel_log_for_vehicle(&mut self, vehicle_id: Uuid) -> AppResult<Option<FuelLog>> {
        let latest = self
            .working
            .fuel_logs
            .values()
            .filter(|log| log.vehicle_id == vehicle_id && log.odometer.is_some())
            .max_by_key(|log| log.date_filled)
            .cloned();
        Ok(latest)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        debug!("💾 Transacción en memoria confirmada");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        debug!("↩️ Transacción en memoria descartada");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let store = MemoryFleetStore::new();
        let vehicle = Vehicle::new("AB-123-CD", Decimal::from(5000));

        let mut tx = store.begin().await.unwrap();
        tx.insert_vehicle(&vehicle).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let found = tx.find_vehicle_for_update(vehicle.id).await.unwrap();
        assert_eq!(found, Some(vehicle));
    }

    #[tokio::test]
    async fn test_dropped_scope_discards_writes() {
        let store = MemoryFleetStore::new();
        let vehicle = Vehicle::new("AB-123-CD", Decimal::from(5000));

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_vehicle(&vehicle).await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_vehicle_for_update(vehicle.id).await.unwrap().is_none());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_vehicle_is_not_found() {
        let store = MemoryFleetStore::new();
        let mut tx = store.begin().await.unwrap();
        let result = tx.update_vehicle_status(Uuid::new_v4(), VehicleStatus::InShop).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_latest_fuel_log_ignores_logs_without_odometer() {
        use crate::models::NewFuelLog;
        use chrono::{Duration, Utc};

        let store = MemoryFleetStore::new();
        let vehicle = Vehicle::new("AB-123-CD", Decimal::from(5000));
        let fill = |odometer: Option<i64>, days_ago: i64| {
            FuelLog::record(
                NewFuelLog {
                    vehicle_id: vehicle.id,
                    gallons: Decimal::from(10),
                    cost: Decimal::from(40),
                    odometer: odometer.map(Decimal::from),
                    location: None,
                },
                Utc::now() - Duration::days(days_ago),
            )
        };

        let mut tx = store.begin().await.unwrap();
        tx.insert_vehicle(&vehicle).await.unwrap();
        tx.insert_fuel_log(&fill(Some(1000), 3)).await.unwrap();
        tx.insert_fuel_log(&fill(Some(1200), 2)).await.unwrap();
        tx.insert_fuel_log(&fill(None, 1)).await.unwrap();

        let latest = tx.latest_fuel_log_for_vehicle(vehicle.id).await.unwrap().unwrap();
        assert_eq!(latest.odometer, Some(Decimal::from(1200)));
        assert!(tx.latest_fuel_log_for_vehicle(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_active_trips_for_vehicle() {
        use crate::models::NewTrip;
        use chrono::{Duration, Utc};

        let store = MemoryFleetStore::new();
        let vehicle = Vehicle::new("AB-123-CD", Decimal::from(5000));
        let driver = Driver::new("Lucie Bernard", "LIC-7", Utc::now() + Duration::days(30));
        let trip_with = |status: TripStatus| {
            let mut trip = Trip::draft(
                NewTrip {
                    vehicle_id: vehicle.id,
                    driver_id: driver.id,
                    cargo_weight: Decimal::from(100),
                    origin: "Nantes".to_string(),
                    destination: "Rennes".to_string(),
                },
                Utc::now(),
            );
            trip.status = status;
            trip
        };
        let dispatched = trip_with(TripStatus::Dispatched);

        let mut tx = store.begin().await.unwrap();
        tx.insert_trip(&dispatched).await.unwrap();
        tx.insert_trip(&trip_with(TripStatus::OnTrip)).await.unwrap();
        tx.insert_trip(&trip_with(TripStatus::Completed)).await.unwrap();
        tx.insert_trip(&trip_with(TripStatus::Draft)).await.unwrap();

        let all = tx
            .count_active_trips_for_vehicle(vehicle.id, Uuid::new_v4(), &TripStatus::ACTIVE)
            .await
            .unwrap();
        let others = tx
            .count_active_trips_for_vehicle(vehicle.id, dispatched.id, &TripStatus::ACTIVE)
            .await
            .unwrap();
        assert_eq!(all, 2);
        assert_eq!(others, 1);
    }
}
