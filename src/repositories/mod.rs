//! Repositorios de la flota
//!
//! Define la frontera con el almacén transaccional: `FleetStore` abre un
//! ámbito transaccional y `StoreTransaction` expone las lecturas y escrituras
//! de vehículos, conductores, viajes, mantenimientos y repostajes dentro de ese ámbito.
//!
//! Todas las lecturas `*_for_update` toman el lock de la fila en la lectura
//! inicial, de modo que un check-then-act dentro del mismo ámbito no compite
//! con otra transacción sobre la misma fila.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Driver, DriverStatus, FuelLog, MaintenanceLog, Trip, TripStatus, Vehicle, VehicleStatus,
};
use crate::utils::errors::AppResult;

pub mod memory_store;
pub mod postgres_store;

pub use memory_store::MemoryFleetStore;
pub use postgres_store::PgFleetStore;

/// Almacén transaccional de entidades de la flota
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Abrir un nuevo ámbito transaccional
    async fn begin(&self) -> AppResult<Box<dyn StoreTransaction>>;
}

/// Ámbito transaccional: todo lo escrito aquí se confirma o se descarta junto.
///
/// Si el ámbito se descarta sin `commit`, sus escrituras no persisten.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn find_vehicle_for_update(&mut self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn insert_vehicle(&mut self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn update_vehicle_status(&mut self, id: Uuid, status: VehicleStatus) -> AppResult<Vehicle>;

    async fn find_driver_for_update(&mut self, id: Uuid) -> AppResult<Option<Driver>>;
    async fn insert_driver(&mut self, driver: &Driver) -> AppResult<Driver>;
    async fn update_driver_status(&mut self, id: Uuid, status: DriverStatus) -> AppResult<Driver>;

    async fn find_trip_for_update(&mut self, id: Uuid) -> AppResult<Option<Trip>>;
    async fn insert_trip(&mut self, trip: &Trip) -> AppResult<Trip>;
    /// Persistir estado, distancia y marcas de tiempo del viaje
    async fn update_trip(&mut self, trip: &Trip) -> AppResult<Trip>;

    /// Contar los viajes del conductor en alguno de `statuses`, sin contar `excluding_trip`
    async fn count_active_trips_for_driver(
        &mut self,
        driver_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64>;

    /// Igual que `count_active_trips_for_driver`, para el vehículo
    async fn count_active_trips_for_vehicle(
        &mut self,
        vehicle_id: Uuid,
        excluding_trip: Uuid,
        statuses: &[TripStatus],
    ) -> AppResult<i64>;

    async fn find_maintenance_log_for_update(&mut self, id: Uuid) -> AppResult<Option<MaintenanceLog>>;
    async fn insert_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog>;
    async fn update_maintenance_log(&mut self, log: &MaintenanceLog) -> AppResult<MaintenanceLog>;

    async fn insert_fuel_log(&mut self, log: &FuelLog) -> AppResult<FuelLog>;
    /// Último repostaje del vehículo con lectura de odómetro
    async fn latest_fuel_log_for_vehicle(&mut self, vehicle_id: Uuid) -> AppResult<Option<FuelLog>>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}
