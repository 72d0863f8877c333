//! Modelo de MaintenanceLog
//! 
//! Registro de servicio de taller. Mientras está abierto el vehículo
//! permanece en IN_SHOP.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub description: String,
    pub cost: Decimal,
    pub service_date: DateTime<Utc>,
    pub is_completed: bool,
    pub completed_date: Option<DateTime<Utc>>,
}

impl MaintenanceLog {
    pub fn open(
        vehicle_id: Uuid,
        description: String,
        cost: Decimal,
        service_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            description,
            cost,
            service_date,
            is_completed: false,
            completed_date: None,
        }
    }
}
