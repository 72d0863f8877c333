//! Modelo de Driver
//! 
//! Mapea a la tabla `drivers`. Un conductor con licencia inválida o vencida
//! nunca puede ser asignado a un viaje despachado, sea cual sea su estado.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use std::fmt;

/// Estado del conductor - mapea al ENUM driver_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "driver_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    OnDuty,
    OffDuty,
    OnTrip,
    Suspended,
}

impl DriverStatus {
    pub const ALL: [DriverStatus; 4] = [
        DriverStatus::OnDuty,
        DriverStatus::OffDuty,
        DriverStatus::OnTrip,
        DriverStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::OnDuty => "ON_DUTY",
            DriverStatus::OffDuty => "OFF_DUTY",
            DriverStatus::OnTrip => "ON_TRIP",
            DriverStatus::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub license_expiry_date: DateTime<Utc>,
    pub license_valid: bool,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    /// Crear un conductor nuevo en estado ON_DUTY con licencia válida
    pub fn new(
        name: impl Into<String>,
        license_number: impl Into<String>,
        license_expiry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            license_number: license_number.into(),
            license_expiry_date,
            license_valid: true,
            status: DriverStatus::OnDuty,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: DriverStatus) -> Self {
        self.status = status;
        self
    }

    /// La licencia es utilizable si está marcada como válida y no ha vencido en `now`
    pub fn license_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.license_valid && self.license_expiry_date >= now
    }
}
