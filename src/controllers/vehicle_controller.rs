use uuid::Uuid;

use crate::dto::vehicle_dto::UpdateVehicleStatusRequest;
use crate::dto::ApiResponse;
use crate::models::Vehicle;
use crate::services::VehicleLifecycleService;
use crate::utils::errors::AppResult;

pub struct VehicleController {
    service: VehicleLifecycleService,
}

impl VehicleController {
    pub fn new(service: VehicleLifecycleService) -> Self {
        Self { service }
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateVehicleStatusRequest,
    ) -> AppResult<ApiResponse<Vehicle>> {
        let vehicle = self.service.update_status(id, request.status).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            format!("Estado del vehículo actualizado a {}", request.status),
        ))
    }

    pub async fn retire(&self, id: Uuid) -> AppResult<ApiResponse<Vehicle>> {
        let vehicle = self.service.retire(id).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Vehículo retirado"))
    }
}
