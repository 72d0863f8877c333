use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::NewFuelLog;

// Request para registrar un repostaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelLogRequest {
    pub vehicle_id: Uuid,
    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub gallons: Decimal,
    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub cost: Decimal,
    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub odometer: Option<Decimal>,
    pub location: Option<String>,
}

impl From<CreateFuelLogRequest> for NewFuelLog {
    fn from(request: CreateFuelLogRequest) -> Self {
        NewFuelLog {
            vehicle_id: request.vehicle_id,
            gallons: request.gallons,
            cost: request.cost,
            odometer: request.odometer,
            location: request.location,
        }
    }
}
