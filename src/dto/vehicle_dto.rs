use serde::Deserialize;

use crate::models::VehicleStatus;

// Request para cambiar el estado de un vehículo
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}
