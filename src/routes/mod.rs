//! Rutas de la API
//!
//! Ensambla los routers de viajes, vehículos, conductores, taller y repostajes sobre el
//! estado compartido.

pub mod driver_routes;
pub mod fuel_routes;
pub mod maintenance_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_from_config;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_from_config(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/trip", trip_routes::create_trip_router())
        .nest("/api/vehicle", vehicle_routes::create_vehicle_router())
        .nest("/api/driver", driver_routes::create_driver_router())
        .nest("/api/maintenance", maintenance_routes::create_maintenance_router())
        .nest("/api/fuel", fuel_routes::create_fuel_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet-dispatch",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
