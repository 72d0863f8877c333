//! Despacho contra PostgreSQL real.
//!
//! Único lugar donde se ejercitan los locks de fila (`FOR UPDATE`), el orden
//! viaje, vehículo, conductor y `lock_timeout`. Requiere `DATABASE_URL`;
//! ejecutar con `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use fleet_dispatch::config::DatabaseConfig;
use fleet_dispatch::database::{DatabaseConnection, RetryPolicy, TransactionRunner};
use fleet_dispatch::models::{
    Driver, DriverStatus, NewFuelLog, NewTrip, TripStatus, Vehicle, VehicleStatus,
};
use fleet_dispatch::repositories::{FleetStore, PgFleetStore};
use fleet_dispatch::services::{FuelService, TripDispatchService, VehicleLifecycleService};
use fleet_dispatch::utils::errors::{AppError, BusinessRule};

async fn pg_store() -> PgFleetStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let config = DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 1,
        acquire_timeout: StdDuration::from_secs(10),
        bootstrap_schema: true,
    };
    let connection = DatabaseConnection::connect(&config).await.unwrap();
    PgFleetStore::new(connection.pool().clone(), 2000)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_dispatch_against_postgres() {
    let store = pg_store().await;

    let vehicle = Vehicle::new(format!("PG-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]), Decimal::from(5000));
    let driver = Driver::new("Inès Moreau", format!("PG-{}", uuid::Uuid::new_v4()), Utc::now() + Duration::days(90));
    let mut tx = store.begin().await.unwrap();
    tx.insert_vehicle(&vehicle).await.unwrap();
    tx.insert_driver(&driver).await.unwrap();
    tx.commit().await.unwrap();

    let runner = TransactionRunner::new(Arc::new(store.clone()), RetryPolicy::default());
    let service = TripDispatchService::new(runner);

    let new_trip = |cargo: i64| NewTrip {
        vehicle_id: vehicle.id,
        driver_id: driver.id,
        cargo_weight: Decimal::from(cargo),
        origin: "Toulouse".to_string(),
        destination: "Bordeaux".to_string(),
    };
    let first = service.create_trip(new_trip(1000)).await.unwrap().id;
    let second = service.create_trip(new_trip(1500)).await.unwrap().id;

    let (a, b) = tokio::join!(
        tokio::spawn({
            let service = service.clone();
            async move { service.dispatch_trip(first).await }
        }),
        tokio::spawn({
            let service = service.clone();
            async move { service.dispatch_trip(second).await }
        }),
    );
    let results = [a.unwrap(), b.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let mut tx = store.begin().await.unwrap();
    let vehicle = tx.find_vehicle_for_update(vehicle.id).await.unwrap().unwrap();
    let driver = tx.find_driver_for_update(driver.id).await.unwrap().unwrap();
    let first = tx.find_trip_for_update(first).await.unwrap().unwrap();
    let second = tx.find_trip_for_update(second).await.unwrap().unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(vehicle.status, VehicleStatus::OnTrip);
    assert_eq!(driver.status, DriverStatus::OnTrip);
    let dispatched = [first.status, second.status]
        .iter()
        .filter(|s| **s == TripStatus::Dispatched)
        .count();
    assert_eq!(dispatched, 1);
}

#[tokio::test]
#[ignore]
async fn test_vehicle_guard_and_odometer_against_postgres() {
    let store = pg_store().await;

    let vehicle = Vehicle::new(format!("PG-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]), Decimal::from(5000));
    let first_driver = Driver::new("Hugo Petit", format!("PG-{}", uuid::Uuid::new_v4()), Utc::now() + Duration::days(90));
    let second_driver = Driver::new("Léa Roux", format!("PG-{}", uuid::Uuid::new_v4()), Utc::now() + Duration::days(90));
    let mut tx = store.begin().await.unwrap();
    tx.insert_vehicle(&vehicle).await.unwrap();
    tx.insert_driver(&first_driver).await.unwrap();
    tx.insert_driver(&second_driver).await.unwrap();
    tx.commit().await.unwrap();

    let runner = TransactionRunner::new(Arc::new(store.clone()), RetryPolicy::default());
    let trips = TripDispatchService::new(runner.clone());
    let vehicles = VehicleLifecycleService::new(runner.clone());
    let fuel = FuelService::new(runner);

    let new_trip = |driver_id| NewTrip {
        vehicle_id: vehicle.id,
        driver_id,
        cargo_weight: Decimal::from(900),
        origin: "Nancy".to_string(),
        destination: "Metz".to_string(),
    };
    let first = trips.create_trip(new_trip(first_driver.id)).await.unwrap().id;
    let second = trips.create_trip(new_trip(second_driver.id)).await.unwrap().id;
    trips.dispatch_trip(first).await.unwrap();
    vehicles.update_status(vehicle.id, VehicleStatus::Available).await.unwrap();

    let err = trips.dispatch_trip(second).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::ValidationFailed(BusinessRule::VehicleNotAvailable { .. })
    ));

    let fill = |odometer: i64| NewFuelLog {
        vehicle_id: vehicle.id,
        gallons: Decimal::from(10),
        cost: Decimal::from(40),
        odometer: Some(Decimal::from(odometer)),
        location: None,
    };
    fuel.add_fuel_log(fill(50_000)).await.unwrap();
    let err = fuel.add_fuel_log(fill(49_000)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::ValidationFailed(BusinessRule::OdometerRollback { .. })
    ));
}
