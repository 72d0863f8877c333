use axum::{
    extract::{Path, State},
    routing::{patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::UpdateVehicleStatusRequest;
use crate::dto::ApiResponse;
use crate::models::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/:id/status", patch(update_vehicle_status))
        .route("/:id/retire", post(retire_vehicle))
}

async fn update_vehicle_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleStatusRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.vehicles.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn retire_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.vehicles.clone());
    let response = controller.retire(id).await?;
    Ok(Json(response))
}
