//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::{DriverStatus, EntityKind, VehicleStatus};

/// SQLSTATE de Postgres que indican un conflicto de concurrencia:
/// serialization_failure, deadlock_detected y lock_not_available
const CONFLICT_SQLSTATES: [&str; 3] = ["40001", "40P01", "55P03"];

/// Reglas de negocio que puede violar una operación
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BusinessRule {
    #[error("cargo weight {cargo_weight} exceeds vehicle capacity {capacity}")]
    CargoExceedsCapacity { cargo_weight: Decimal, capacity: Decimal },

    #[error("cargo weight must be positive, got {0}")]
    NonPositiveCargo(Decimal),

    #[error("vehicle {vehicle_id} is not available (status {status})")]
    VehicleNotAvailable { vehicle_id: Uuid, status: VehicleStatus },

    #[error("driver {driver_id} is not on duty (status {status})")]
    DriverNotOnDuty { driver_id: Uuid, status: DriverStatus },

    #[error("driver {driver_id} already has an active trip")]
    DriverHasActiveTrip { driver_id: Uuid, active_trips: i64 },

    #[error("driver {driver_id} has an expired or invalid license")]
    LicenseInvalid { driver_id: Uuid },

    #[error("distance must be positive, got {0}")]
    NonPositiveDistance(Decimal),

    #[error("vehicle {vehicle_id} cannot enter the shop while {status}")]
    VehicleNotServiceable { vehicle_id: Uuid, status: VehicleStatus },

    #[error("maintenance log {0} is already completed")]
    MaintenanceAlreadyCompleted(Uuid),

    #[error("odometer rollback for vehicle {vehicle_id}: {reading} is below last reading {previous}")]
    OdometerRollback {
        vehicle_id: Uuid,
        reading: Decimal,
        previous: Decimal,
    },
}

impl BusinessRule {
    /// Código estable de la regla para los clientes de la API
    pub fn code(&self) -> &'static str {
        match self {
            BusinessRule::CargoExceedsCapacity { .. } => "CARGO_EXCEEDS_CAPACITY",
            BusinessRule::NonPositiveCargo(_) => "NON_POSITIVE_CARGO",
            BusinessRule::VehicleNotAvailable { .. } => "VEHICLE_NOT_AVAILABLE",
            BusinessRule::DriverNotOnDuty { .. } => "DRIVER_NOT_ON_DUTY",
            BusinessRule::DriverHasActiveTrip { .. } => "DRIVER_HAS_ACTIVE_TRIP",
            BusinessRule::LicenseInvalid { .. } => "LICENSE_INVALID",
            BusinessRule::NonPositiveDistance(_) => "NON_POSITIVE_DISTANCE",
            BusinessRule::VehicleNotServiceable { .. } => "VEHICLE_NOT_SERVICEABLE",
            BusinessRule::MaintenanceAlreadyCompleted(_) => "MAINTENANCE_ALREADY_COMPLETED",
            BusinessRule::OdometerRollback { .. } => "ODOMETER_ROLLBACK",
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition for {entity} from {current} to {requested}")]
    StateTransitionRejected {
        entity: EntityKind,
        current: String,
        requested: String,
    },

    #[error("validation failed: {0}")]
    ValidationFailed(#[from] BusinessRule),

    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Indica si el error proviene de un conflicto entre transacciones
    /// concurrentes (y por lo tanto la operación puede reintentarse)
    pub fn is_concurrency_conflict(&self) -> bool {
        match self {
            AppError::ConcurrencyConflict(_) => true,
            AppError::Database(sqlx::Error::Database(db_error)) => db_error
                .code()
                .map_or(false, |code| CONFLICT_SQLSTATES.iter().any(|state| *state == code)),
            _ => false,
        }
    }

    /// Regla de negocio violada, si la hay
    pub fn business_rule(&self) -> Option<&BusinessRule> {
        match self {
            AppError::ValidationFailed(rule) => Some(rule),
            _ => None,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("⚠️ Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::StateTransitionRejected { entity, current, requested } => {
                warn!("⚠️ {}", message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "State Transition Rejected".to_string(),
                        message,
                        details: Some(json!({
                            "entity": entity,
                            "current": current,
                            "requested": requested,
                        })),
                        code: Some("STATE_TRANSITION_REJECTED".to_string()),
                    },
                )
            }

            AppError::ValidationFailed(rule) => {
                warn!("⚠️ Business rule violated: {}", rule);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Failed".to_string(),
                        message,
                        details: None,
                        code: Some(rule.code().to_string()),
                    },
                )
            }

            AppError::ConcurrencyConflict(msg) => {
                warn!("⚠️ Concurrency conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONCURRENCY_CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(entity: EntityKind, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", entity, id))
}

/// Función helper para crear errores de transición de estado rechazada
pub fn transition_rejected(
    entity: EntityKind,
    current: impl ToString,
    requested: impl ToString,
) -> AppError {
    AppError::StateTransitionRejected {
        entity,
        current: current.to_string(),
        requested: requested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_rejected_message() {
        let err = transition_rejected(EntityKind::Vehicle, VehicleStatus::Retired, VehicleStatus::Available);
        assert_eq!(
            err.to_string(),
            "Invalid state transition for Vehicle from RETIRED to AVAILABLE"
        );
        assert!(!err.is_concurrency_conflict());
    }

    #[test]
    fn test_business_rule_message_names_rule() {
        let err = AppError::from(BusinessRule::CargoExceedsCapacity {
            cargo_weight: Decimal::from(6000),
            capacity: Decimal::from(5000),
        });
        assert_eq!(
            err.to_string(),
            "validation failed: cargo weight 6000 exceeds vehicle capacity 5000"
        );
        assert_eq!(err.business_rule().map(|r| r.code()), Some("CARGO_EXCEEDS_CAPACITY"));
    }

    #[test]
    fn test_concurrency_conflict_is_retryable() {
        assert!(AppError::ConcurrencyConflict("busy".into()).is_concurrency_conflict());
        assert!(!AppError::NotFound("x".into()).is_concurrency_conflict());
    }

    #[test]
    fn test_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            not_found_error(EntityKind::Trip, id).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            transition_rejected(EntityKind::Trip, "COMPLETED", "CANCELLED")
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(BusinessRule::LicenseInvalid { driver_id: id })
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ConcurrencyConflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
