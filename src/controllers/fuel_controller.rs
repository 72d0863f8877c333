use validator::Validate;

use crate::dto::fuel_dto::CreateFuelLogRequest;
use crate::dto::ApiResponse;
use crate::models::FuelLog;
use crate::services::FuelService;
use crate::utils::errors::{AppError, AppResult};

pub struct FuelController {
    service: FuelService,
}

impl FuelController {
    pub fn new(service: FuelService) -> Self {
        Self { service }
    }

    pub async fn add_fuel_log(&self, request: CreateFuelLogRequest) -> AppResult<ApiResponse<FuelLog>> {
        request.validate().map_err(AppError::Validation)?;

        let log = self.service.add_fuel_log(request.into()).await?;
        Ok(ApiResponse::success(log))
    }
}
