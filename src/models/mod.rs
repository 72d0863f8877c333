//! Modelos del sistema
//! 
//! Este módulo contiene los modelos de datos de la flota (vehículos,
//! conductores, viajes, mantenimientos y repostajes) que mapean exactamente
//! al schema PostgreSQL.

use serde::Serialize;
use std::fmt;

pub mod driver;
pub mod fuel;
pub mod maintenance;
pub mod trip;
pub mod vehicle;

pub use driver::{Driver, DriverStatus};
pub use fuel::{FuelLog, NewFuelLog};
pub use maintenance::MaintenanceLog;
pub use trip::{NewTrip, Trip, TripStatus};
pub use vehicle::{Vehicle, VehicleStatus};

/// Tipo de entidad persistida, usado en errores y logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Vehicle,
    Driver,
    Trip,
    MaintenanceLog,
    FuelLog,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Vehicle => "Vehicle",
            EntityKind::Driver => "Driver",
            EntityKind::Trip => "Trip",
            EntityKind::MaintenanceLog => "MaintenanceLog",
            EntityKind::FuelLog => "FuelLog",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
