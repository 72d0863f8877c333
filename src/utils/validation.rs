//! Utilidades de validación
//! 
//! Validadores custom usados por los DTOs con `#[validate(custom = ...)]`.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validar que un decimal sea estrictamente positivo
pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un decimal no sea negativo
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
