//! Controladores HTTP
//!
//! Validan los requests y delegan en los servicios de la flota.

pub mod driver_controller;
pub mod fuel_controller;
pub mod maintenance_controller;
pub mod trip_controller;
pub mod vehicle_controller;
