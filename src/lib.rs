//! Fleet Dispatch
//!
//! Núcleo de despacho de una flota: máquinas de estado de vehículos,
//! conductores y viajes, coordinador transaccional de despacho y flujo de
//! taller, expuestos sobre una API HTTP con Axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
