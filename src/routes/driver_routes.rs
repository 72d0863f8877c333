use axum::{
    extract::{Path, State},
    routing::{patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::UpdateDriverStatusRequest;
use crate::dto::ApiResponse;
use crate::models::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/:id/status", patch(update_driver_status))
        .route("/:id/suspend", post(suspend_driver))
}

async fn update_driver_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverStatusRequest>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn suspend_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Driver>>, AppError> {
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.suspend(id).await?;
    Ok(Json(response))
}
