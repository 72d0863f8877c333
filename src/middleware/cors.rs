//! Middleware de CORS
//!
//! Este módulo maneja la configuración de CORS para permitir
//! requests desde diferentes orígenes.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::environment::EnvironmentConfig;

/// Elegir la política de CORS según la configuración.
///
/// Sin orígenes configurados se permite cualquiera (desarrollo).
pub fn cors_from_config(config: &EnvironmentConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        if config.is_production() {
            warn!("⚠️ CORS_ORIGINS vacío en producción: se permite cualquier origen");
        }
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    }
}

/// CORS permisivo, sólo para desarrollo
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ Origen CORS inválido ignorado: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}
