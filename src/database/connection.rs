//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool de PostgreSQL y, si se pide, aplica el schema
//! de la flota (`sql/schema.sql`), que es idempotente.

use anyhow::{Context, Result};
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Conexión a la base de datos de la flota
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abrir el pool y aplicar el schema si `bootstrap_schema` está activo
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a PostgreSQL en {}", mask_database_url(&config.url));
        let pool = config
            .create_pool()
            .await
            .context("failed to connect to PostgreSQL")?;

        let connection = Self { pool };
        if config.bootstrap_schema {
            connection.bootstrap_schema().await?;
        }

        info!("✅ Conexión a PostgreSQL establecida");
        Ok(connection)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Crear tipos, tablas e índices de la flota si no existen
    pub async fn bootstrap_schema(&self) -> Result<()> {
        (&self.pool)
            .execute(SCHEMA_SQL)
            .await
            .context("failed to apply fleet schema")?;
        info!("🗄️ Schema de la flota aplicado");
        Ok(())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
