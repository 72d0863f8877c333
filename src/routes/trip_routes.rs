use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::trip_controller::TripController;
use crate::dto::trip_dto::{CompleteTripRequest, CreateTripRequest};
use crate::dto::ApiResponse;
use crate::models::Trip;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip))
        .route("/:id/dispatch", post(dispatch_trip))
        .route("/:id/start", post(start_trip))
        .route("/:id/complete", post(complete_trip))
        .route("/:id/cancel", post(cancel_trip))
}

async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Trip>>), AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn dispatch_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    Ok(Json(controller.dispatch(id).await?))
}

async fn start_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    Ok(Json(controller.start(id).await?))
}

async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteTripRequest>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    Ok(Json(controller.complete(id, request).await?))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    Ok(Json(controller.cancel(id).await?))
}
