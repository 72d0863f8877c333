//! Modelo de Trip
//! 
//! Un viaje referencia (sin poseerlos) a un vehículo y a un conductor.
//! Nace en DRAFT y sólo el `TripDispatchService` cambia su estado.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;
use std::fmt;

/// Estado del viaje - mapea al ENUM trip_status
///
/// `OnTrip` es el marcador "en tránsito" del viaje; no confundir con el
/// estado ON_TRIP de vehículos y conductores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "trip_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Draft,
    Dispatched,
    OnTrip,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 5] = [
        TripStatus::Draft,
        TripStatus::Dispatched,
        TripStatus::OnTrip,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    /// Estados en los que el viaje retiene su vehículo y su conductor
    pub const ACTIVE: [TripStatus; 2] = [TripStatus::Dispatched, TripStatus::OnTrip];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "DRAFT",
            TripStatus::Dispatched => "DISPATCHED",
            TripStatus::OnTrip => "ON_TRIP",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn holds_resources(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trip principal - mapea exactamente a la tabla trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub cargo_weight: Decimal,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub distance_km: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Datos para crear un viaje en DRAFT
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub cargo_weight: Decimal,
    pub origin: String,
    pub destination: String,
}

impl Trip {
    pub fn draft(new_trip: NewTrip, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: new_trip.vehicle_id,
            driver_id: new_trip.driver_id,
            cargo_weight: new_trip.cargo_weight,
            origin: new_trip.origin,
            destination: new_trip.destination,
            status: TripStatus::Draft,
            distance_km: None,
            created_at: now,
            dispatched_at: None,
            started_at: None,
            ended_at: None,
        }
    }
}
