//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todos los servicios comparten el mismo
//! `TransactionRunner` y, por lo tanto, el mismo almacén.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::database::transaction::{RetryPolicy, TransactionRunner};
use crate::repositories::FleetStore;
use crate::services::{
    DriverLifecycleService, FuelService, MaintenanceService, TripDispatchService, VehicleLifecycleService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub trips: TripDispatchService,
    pub vehicles: VehicleLifecycleService,
    pub drivers: DriverLifecycleService,
    pub maintenance: MaintenanceService,
    pub fuel: FuelService,
}

impl AppState {
    pub fn new(store: Arc<dyn FleetStore>, config: EnvironmentConfig) -> Self {
        let runner = TransactionRunner::new(
            store,
            RetryPolicy {
                max_retries: config.dispatch.max_retries,
            },
        );

        Self {
            config,
            trips: TripDispatchService::new(runner.clone()),
            vehicles: VehicleLifecycleService::new(runner.clone()),
            drivers: DriverLifecycleService::new(runner.clone()),
            maintenance: MaintenanceService::new(runner.clone()),
            fuel: FuelService::new(runner),
        }
    }
}
