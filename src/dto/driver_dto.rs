use serde::Deserialize;

use crate::models::DriverStatus;

// Request para cambiar el estado de un conductor
#[derive(Debug, Deserialize)]
pub struct UpdateDriverStatusRequest {
    pub status: DriverStatus,
}
