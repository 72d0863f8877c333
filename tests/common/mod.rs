#![allow(dead_code)]

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use fleet_dispatch::config::EnvironmentConfig;
use fleet_dispatch::models::{
    Driver, DriverStatus, NewTrip, Trip, TripStatus, Vehicle, VehicleStatus,
};
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore};
use fleet_dispatch::state::AppState;

/// Flota en memoria con su estado de aplicación
pub struct TestFleet {
    pub store: MemoryFleetStore,
    pub state: AppState,
}

pub fn memory_config() -> EnvironmentConfig {
    EnvironmentConfig::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("memory config must parse")
}

pub fn test_fleet() -> TestFleet {
    let store = MemoryFleetStore::new();
    let state = AppState::new(Arc::new(store.clone()), memory_config());
    TestFleet { store, state }
}

pub async fn seed_vehicle(store: &MemoryFleetStore, capacity_kg: i64) -> Vehicle {
    seed_vehicle_with_status(store, capacity_kg, VehicleStatus::Available).await
}

pub async fn seed_vehicle_with_status(
    store: &MemoryFleetStore,
    capacity_kg: i64,
    status: VehicleStatus,
) -> Vehicle {
    let plate = format!("FL-{}", &Uuid::new_v4().simple().to_string()[..6]);
    let vehicle = Vehicle::new(plate, Decimal::from(capacity_kg)).with_status(status);
    let mut tx = store.begin().await.unwrap();
    let vehicle = tx.insert_vehicle(&vehicle).await.unwrap();
    tx.commit().await.unwrap();
    vehicle
}

pub async fn seed_driver(store: &MemoryFleetStore) -> Driver {
    seed_driver_with(store, DriverStatus::OnDuty, Duration::days(365), true).await
}

/// Conductor con estado, vencimiento de licencia relativo a ahora y validez dados
pub async fn seed_driver_with(
    store: &MemoryFleetStore,
    status: DriverStatus,
    expires_in: Duration,
    license_valid: bool,
) -> Driver {
    let mut driver = Driver::new(
        "Camille Martin",
        format!("LIC-{}", &Uuid::new_v4().simple().to_string()[..8]),
        Utc::now() + expires_in,
    )
    .with_status(status);
    driver.license_valid = license_valid;

    let mut tx = store.begin().await.unwrap();
    let driver = tx.insert_driver(&driver).await.unwrap();
    tx.commit().await.unwrap();
    driver
}

/// Insertar un viaje directamente con el estado indicado
pub async fn seed_trip_with_status(
    store: &MemoryFleetStore,
    vehicle: &Vehicle,
    driver: &Driver,
    cargo_weight: i64,
    status: TripStatus,
) -> Trip {
    let mut trip = Trip::draft(new_trip(vehicle, driver, cargo_weight), Utc::now());
    trip.status = status;
    let mut tx = store.begin().await.unwrap();
    let trip = tx.insert_trip(&trip).await.unwrap();
    tx.commit().await.unwrap();
    trip
}

pub fn new_trip(vehicle: &Vehicle, driver: &Driver, cargo_weight: i64) -> NewTrip {
    NewTrip {
        vehicle_id: vehicle.id,
        driver_id: driver.id,
        cargo_weight: Decimal::from(cargo_weight),
        origin: "Lyon".to_string(),
        destination: "Marseille".to_string(),
    }
}

pub async fn vehicle_status(store: &MemoryFleetStore, id: Uuid) -> VehicleStatus {
    let mut tx = store.begin().await.unwrap();
    let vehicle = tx.find_vehicle_for_update(id).await.unwrap().unwrap();
    tx.rollback().await.unwrap();
    vehicle.status
}

pub async fn driver_status(store: &MemoryFleetStore, id: Uuid) -> DriverStatus {
    let mut tx = store.begin().await.unwrap();
    let driver = tx.find_driver_for_update(id).await.unwrap().unwrap();
    tx.rollback().await.unwrap();
    driver.status
}

pub async fn load_trip(store: &MemoryFleetStore, id: Uuid) -> Trip {
    let mut tx = store.begin().await.unwrap();
    let trip = tx.find_trip_for_update(id).await.unwrap().unwrap();
    tx.rollback().await.unwrap();
    trip
}
