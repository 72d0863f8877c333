//! Services module
//!
//! Este módulo contiene la lógica de negocio de la flota. Los servicios
//! encapsulan operaciones que involucran varios modelos dentro de una
//! misma transacción.

pub mod driver_lifecycle;
pub mod fuel_service;
pub mod maintenance_service;
pub mod transition_validator;
pub mod trip_dispatch_service;
pub mod vehicle_lifecycle;

pub use driver_lifecycle::DriverLifecycleService;
pub use fuel_service::FuelService;
pub use maintenance_service::{MaintenanceService, NewService};
pub use transition_validator::LifecycleStatus;
pub use trip_dispatch_service::TripDispatchService;
pub use vehicle_lifecycle::VehicleLifecycleService;
