use uuid::Uuid;

use crate::dto::driver_dto::UpdateDriverStatusRequest;
use crate::dto::ApiResponse;
use crate::models::Driver;
use crate::services::DriverLifecycleService;
use crate::utils::errors::AppResult;

pub struct DriverController {
    service: DriverLifecycleService,
}

impl DriverController {
    pub fn new(service: DriverLifecycleService) -> Self {
        Self { service }
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateDriverStatusRequest,
    ) -> AppResult<ApiResponse<Driver>> {
        let driver = self.service.update_status(id, request.status).await?;
        Ok(ApiResponse::success_with_message(
            driver,
            format!("Estado del conductor actualizado a {}", request.status),
        ))
    }

    pub async fn suspend(&self, id: Uuid) -> AppResult<ApiResponse<Driver>> {
        let driver = self.service.suspend(id).await?;
        Ok(ApiResponse::success_with_message(driver, "Conductor suspendido"))
    }
}
