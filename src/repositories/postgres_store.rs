//! Almacén PostgreSQL
//!
//! Cada ámbito es una transacción SQLx en READ COMMITTED con `lock_timeout`
//! local. Las lecturas `*_for_update` usan `SELECT ... FOR UPDATE`: la segunda
//! transacción que toca la misma fila espera al commit de la primera y luego
//! lee el valor ya confirmado.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{FleetStore, StoreTransaction};
use crate::models::{
    Driver, DriverStatus, EntityKind, FuelLog, MaintenanceLog, Trip, TripStatus, Vehicle, VehicleStatus,
};
use crate::utils::errors::{not_found_error, AppResult};

const VEHICLE_COLUMNS: &str = "id, license_plate, capacity_kg, status, created_at";
const DRIVER_COLUMNS: &str =
    "id, name, license_number, license_expiry_date, license_valid, status, created_at";
const TRIP_COLUMNS: &str = "id, vehicle_id, driver_id, cargo_weight, origin, destination, status, \
     distance_km, created_at, dispatched_at, started_at, ended_at";
const MAINTENANCE_COLUMNS: &str =
    "id, vehicle_id, description, cost, service_date, is_completed, completed_date";
const FUEL_COLUMNS: &str = "id, vehicle_id, gallons, cost, odometer, location, date_filled";

#[derive(Clone)]
pub struct PgFleetStore {
    pool: PgPool,
    lock_timeout_ms: u64,
}

impl PgFleetStore {
    pub fn new(pool: PgPool, lock_timeout_ms: u64) -> Self {
        Self { pool, lock_timeout_ms }
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>> {
        let mut tx = self.pool.begin().await?;
        // SET no admite parámetros enlazados; el valor es un entero propio
        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }
}

struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgStoreTransaction {
    /// `owner_column` es siempre una columna fija de `trips`, nunca entrada externa
    async fn count_trips(
        &mut self,
        owner_column: &'static str,
        owner_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM trips WHERE {} = $1 AND id <> $2 AND status::text = ANY($3)",
            owner_column
        ))
        .bind(owner_id)
        .bind(excluding_trip)
        .bind(statuses)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(count)
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE id = $1 FOR UPDATE",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(vehicle)
    }

    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles ({cols})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {cols}
            "#,
            cols = VEHICLE_COLUMNS
        ))
        .bind(vehicle.id)
        .bind(&vehicle.license_plate)
        .bind(vehicle.capacity_kg)
        .bind(vehicle.status)
        .bind(vehicle.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(vehicle)
    }

    async fn update_vehicle_status(&mut self, id: Uuid, status: VehicleStatus) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING {}",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Vehicle, id))
    }

    async fn find_driver_for_update(&mut self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE id = $1 FOR UPDATE",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(driver)
    }

    async fn insert_driver(&mut self, driver: &Driver) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            r#"
            INSERT INTO drivers ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = DRIVER_COLUMNS
        ))
        .bind(driver.id)
        .bind(&driver.name)
        .bind(&driver.license_number)
        .bind(driver.license_expiry_date)
        .bind(driver.license_valid)
        .bind(driver.status)
        .bind(driver.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(driver)
    }

    async fn update_driver_status(&mut self, id: Uuid, status: DriverStatus) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(&format!(
            "UPDATE drivers SET status = $2 WHERE id = $1 RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Driver, id))
    }

    async fn find_trip_for_update(&mut self, id: Uuid) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            "SELECT {} FROM trips WHERE id = $1 FOR UPDATE",
            TRIP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(trip)
    }

    async fn insert_trip(&mut self, trip: &Trip) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(&format!(
            r#"
            INSERT INTO trips ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {cols}
            "#,
            cols = TRIP_COLUMNS
        ))
        .bind(trip.id)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.cargo_weight)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.status)
        .bind(trip.distance_km)
        .bind(trip.created_at)
        .bind(trip.dispatched_at)
        .bind(trip.started_at)
        .bind(trip.ended_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(trip)
    }

    async fn update_trip(&mut self, trip: &Trip) -> AppResult<Trip> {
        sqlx::query_as::<_, Trip>(&format!(
            r#"
            UPDATE trips
            SET status = $2, distance_km = $3, dispatched_at = $4, started_at = $5, ended_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            TRIP_COLUMNS
        ))
        .bind(trip.id)
        .bind(trip.status)
        .bind(trip.distance_km)
        .bind(trip.dispatched_at)
        .bind(trip.started_at)
        .bind(trip.ended_at)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::Trip, trip.id))
    }

    async fn count_active_trips_for_driver(
        &mut self,
        driver_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64> {
        self.count_trips("driver_id", driver_id, excluding_trip, statuses).await
    }

    async fn count_active_trips_for_vehicle(
        &mut self,
        vehicle_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64> {
        self.count_trips("vehicle_id", vehicle_id, excluding_trip, statuses).await
    }

    async fn find_maintenance_log_for_update(&mut self, id: Uuid) -> AppResult<Option<MaintenanceLog>> {
        let log = sqlx::query_as::<_, MaintenanceLog>(&format!(
            "SELECT {} FROM maintenance_logs WHERE id = $1 FOR UPDATE",
            MAINTENANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(log)
    }

    async fn insert_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog> {
        let log = sqlx::query_as::<_, MaintenanceLog>(&format!(
            r#"
            INSERT INTO maintenance_logs ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = MAINTENANCE_COLUMNS
        ))
        .bind(log.id)
        .bind(log.vehicle_id)
        .bind(&log.description)
        .bind(log.cost)
        .bind(log.service_date)
        .bind(log.is_completed)
        .bind(log.completed_date)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(log)
    }

    async fn update_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>(&format!(
            r#"
            UPDATE maintenance_logs
            SET cost = $2, is_completed = $3, completed_date = $4
            WHERE id = $1
            RETURNING {}
            "#,
            MAINTENANCE_COLUMNS
        ))
        .bind(log.id)
        .bind(log.cost)
        .bind(log.is_completed)
        .bind(log.completed_date)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(EntityKind::MaintenanceLog, log.id))
    }

    async fn insert_fuel_log(&mut self, log: &FuelLog) -> AppResult<FuelLog> {
        let log = sqlx::query_as::<_, FuelLog>(&format!(
            r#"
            INSERT INTO fuel_logs ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = FUEL_COLUMNS
        ))
        .bind(log.id)
        .bind(log.vehicle_id)
        .bind(log.gallons)
        .bind(log.cost)
        .bind(log.odometer)
        .bind(&log.location)
        .bind(log.date_filled)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(log)
    }

    async fn latest_fuel_log_for_vehicle(&mut self, vehicle_id: Uuid) -> AppResult<Option<FuelLog>> {
        let log = sqlx::query_as::<_, FuelLog>(&format!(
            r#"
            SELECT {}
            FROM fuel_logs
            WHERE vehicle_id = $1 AND odometer IS NOT NULL
            ORDER BY date_filled DESC
            LIMIT 1
            "#,
            FUEL_COLUMNS
        ))
        .bind(vehicle_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(log)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let this = *self;
        this.tx.commit().await?;
        debug!("💾 Transacción PostgreSQL confirmada");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let this = *self;
        this.tx.rollback().await?;
        debug!("↩️ Transacción PostgreSQL revertida");
        Ok(())
    }
}
