//! DTOs de la API
//!
//! Requests validados con `validator` y el envoltorio común de respuestas.

pub mod common;
pub mod driver_dto;
pub mod fuel_dto;
pub mod maintenance_dto;
pub mod trip_dto;
pub mod vehicle_dto;

pub use common::ApiResponse;
