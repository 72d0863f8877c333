use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::controllers::fuel_controller::FuelController;
use crate::dto::fuel_dto::CreateFuelLogRequest;
use crate::dto::ApiResponse;
use crate::models::FuelLog;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new().route("/", post(add_fuel_log))
}

async fn add_fuel_log(
    State(state): State<AppState>,
    Json(request): Json<CreateFuelLogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FuelLog>>), AppError> {
    let controller = FuelController::new(state.fuel.clone());
    let response = controller.add_fuel_log(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
