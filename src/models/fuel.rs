//! Modelo de FuelLog
//!
//! Repostaje de un vehículo. La lectura de odómetro es opcional, pero cuando
//! existe no puede ser menor que la última registrada.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FuelLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub gallons: Decimal,
    pub cost: Decimal,
    pub odometer: Option<Decimal>,
    pub location: Option<String>,
    pub date_filled: DateTime<Utc>,
}

/// Datos de un repostaje antes de persistirlo
#[derive(Debug, Clone)]
pub struct NewFuelLog {
    pub vehicle_id: Uuid,
    pub gallons: Decimal,
    pub cost: Decimal,
    pub odometer: Option<Decimal>,
    pub location: Option<String>,
}

impl FuelLog {
    pub fn record(new_log: NewFuelLog, date_filled: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: new_log.vehicle_id,
            gallons: new_log.gallons,
            cost: new_log.cost,
            odometer: new_log.odometer,
            location: new_log.location,
            date_filled,
        }
    }
}
