use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::NewTrip;

// Request para crear un viaje en DRAFT
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub cargo_weight: Decimal,
    #[validate(length(min = 1, max = 255))]
    pub origin: String,
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
}

impl From<CreateTripRequest> for NewTrip {
    fn from(request: CreateTripRequest) -> Self {
        NewTrip {
            vehicle_id: request.vehicle_id,
            driver_id: request.driver_id,
            cargo_weight: request.cargo_weight,
            origin: request.origin,
            destination: request.destination,
        }
    }
}

// Request para completar un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTripRequest {
    #[validate(custom = "crate::utils::validation::validate_positive_decimal")]
    pub distance_km: Decimal,
}
