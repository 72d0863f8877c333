use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_dispatch::config::{EnvironmentConfig, StorageBackend};
use fleet_dispatch::database::DatabaseConnection;
use fleet_dispatch::repositories::{FleetStore, MemoryFleetStore, PgFleetStore};
use fleet_dispatch::routes::create_router;
use fleet_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Fleet Dispatch - API de despacho de flota");
    info!("================================================");

    let store: Arc<dyn FleetStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let Some(database) = config.database.as_ref() else {
                return Err(anyhow::anyhow!("PostgreSQL backend selected without database settings"));
            };
            let connection = match DatabaseConnection::connect(database).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            Arc::new(PgFleetStore::new(
                connection.pool().clone(),
                config.dispatch.lock_timeout_ms,
            ))
        }
        StorageBackend::Memory => {
            warn!("🧪 Usando almacén en memoria: los datos no persisten");
            Arc::new(MemoryFleetStore::new())
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🧾 Viajes:");
    info!("   POST /api/trip - Crear viaje (DRAFT)");
    info!("   POST /api/trip/:id/dispatch - Despachar viaje");
    info!("   POST /api/trip/:id/start - Iniciar viaje");
    info!("   POST /api/trip/:id/complete - Completar viaje");
    info!("   POST /api/trip/:id/cancel - Cancelar viaje");
    info!("🚗 Vehículos:");
    info!("   PATCH /api/vehicle/:id/status - Cambiar estado");
    info!("   POST  /api/vehicle/:id/retire - Retirar vehículo");
    info!("🧑 Conductores:");
    info!("   PATCH /api/driver/:id/status - Cambiar estado");
    info!("   POST  /api/driver/:id/suspend - Suspender conductor");
    info!("🔧 Taller:");
    info!("   POST /api/maintenance - Abrir servicio");
    info!("   POST /api/maintenance/:id/complete - Cerrar servicio");
    info!("⛽ Repostajes:");
    info!("   POST /api/fuel - Registrar repostaje");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
