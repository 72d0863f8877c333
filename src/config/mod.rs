//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y parámetros del despacho.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
