use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::services::NewService;

// Request para abrir un servicio de taller
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: Uuid,
    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub description: String,
    #[validate(custom = "crate::utils::validation::validate_non_negative_decimal")]
    pub cost: Option<Decimal>,
    pub service_date: Option<DateTime<Utc>>,
}

impl From<CreateMaintenanceRequest> for NewService {
    fn from(request: CreateMaintenanceRequest) -> Self {
        NewService {
            vehicle_id: request.vehicle_id,
            description: request.description,
            cost: request.cost,
            service_date: request.service_date,
        }
    }
}

// Request para cerrar un servicio de taller
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompleteMaintenanceRequest {
    #[validate(custom = "crate::utils::validation::validate_non_negative_decimal")]
    #[serde(default)]
    pub final_cost: Option<Decimal>,
}
