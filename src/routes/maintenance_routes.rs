use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{CompleteMaintenanceRequest, CreateMaintenanceRequest};
use crate::dto::ApiResponse;
use crate::models::MaintenanceLog;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_service))
        .route("/:id/complete", post(complete_service))
}

async fn add_service(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceLog>>), AppError> {
    let controller = MaintenanceController::new(state.maintenance.clone());
    let response = controller.add_service(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn complete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceLog>>, AppError> {
    let controller = MaintenanceController::new(state.maintenance.clone());
    let response = controller.complete_service(id, request).await?;
    Ok(Json(response))
}
