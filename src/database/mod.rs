//! Módulo de base de datos
//!
//! Maneja el pool de PostgreSQL y la ejecución transaccional de las
//! operaciones de la flota.

pub mod connection;
pub mod transaction;

pub use connection::DatabaseConnection;
pub use transaction::{RetryPolicy, TransactionRunner};
