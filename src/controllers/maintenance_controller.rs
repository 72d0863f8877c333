use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::{CompleteMaintenanceRequest, CreateMaintenanceRequest};
use crate::dto::ApiResponse;
use crate::models::MaintenanceLog;
use crate::services::MaintenanceService;
use crate::utils::errors::{AppError, AppResult};

pub struct MaintenanceController {
    service: MaintenanceService,
}

impl MaintenanceController {
    pub fn new(service: MaintenanceService) -> Self {
        Self { service }
    }

    pub async fn add_service(
        &self,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceLog>> {
        request.validate().map_err(AppError::Validation)?;

        let log = self.service.add_service(request.into()).await?;
        Ok(ApiResponse::success_with_message(log, "Vehículo enviado al taller"))
    }

    pub async fn complete_service(
        &self,
        id: Uuid,
        request: CompleteMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceLog>> {
        request.validate().map_err(AppError::Validation)?;

        let log = self.service.complete_service(id, request.final_cost).await?;
        Ok(ApiResponse::success_with_message(log, "Servicio de taller cerrado"))
    }
}
