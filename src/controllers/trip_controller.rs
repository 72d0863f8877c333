use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{CompleteTripRequest, CreateTripRequest};
use crate::dto::ApiResponse;
use crate::models::Trip;
use crate::services::TripDispatchService;
use crate::utils::errors::{AppError, AppResult};

pub struct TripController {
    service: TripDispatchService,
}

impl TripController {
    pub fn new(service: TripDispatchService) -> Self {
        Self { service }
    }

    pub async fn create(&self, request: CreateTripRequest) -> AppResult<ApiResponse<Trip>> {
        request.validate().map_err(AppError::Validation)?;

        let trip = self.service.create_trip(request.into()).await?;
        Ok(ApiResponse::success_with_message(trip, "Viaje creado en DRAFT"))
    }

    pub async fn dispatch(&self, id: Uuid) -> AppResult<ApiResponse<Trip>> {
        let trip = self.service.dispatch_trip(id).await?;
        Ok(ApiResponse::success_with_message(trip, "Viaje despachado"))
    }

    pub async fn start(&self, id: Uuid) -> AppResult<ApiResponse<Trip>> {
        let trip = self.service.start_trip(id).await?;
        Ok(ApiResponse::success_with_message(trip, "Viaje en tránsito"))
    }

    pub async fn complete(&self, id: Uuid, request: CompleteTripRequest) -> AppResult<ApiResponse<Trip>> {
        request.validate().map_err(AppError::Validation)?;

        let trip = self.service.complete_trip(id, request.distance_km).await?;
        Ok(ApiResponse::success_with_message(trip, "Viaje completado"))
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<ApiResponse<Trip>> {
        let trip = self.service.cancel_trip(id).await?;
        Ok(ApiResponse::success_with_message(trip, "Viaje cancelado"))
    }
}
