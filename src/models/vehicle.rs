//! Modelo de Vehicle
//! 
//! Este módulo contiene el struct Vehicle y su estado de ciclo de vida.
//! Mapea exactamente a la tabla `vehicles` con primary key 'id'.
//! El estado sólo se modifica a través de `VehicleLifecycleService`.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;
use std::fmt;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    OnTrip,
    InShop,
    Retired,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Available,
        VehicleStatus::OnTrip,
        VehicleStatus::InShop,
        VehicleStatus::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::OnTrip => "ON_TRIP",
            VehicleStatus::InShop => "IN_SHOP",
            VehicleStatus::Retired => "RETIRED",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    /// Capacidad de carga en kg
    pub capacity_kg: Decimal,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Crear un vehículo nuevo en estado AVAILABLE
    pub fn new(license_plate: impl Into<String>, capacity_kg: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            license_plate: license_plate.into(),
            capacity_kg,
            status: VehicleStatus::Available,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn can_carry(&self, cargo_weight: Decimal) -> bool {
        cargo_weight <= self.capacity_kg
    }
}
