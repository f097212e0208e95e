//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([01]?\d|2[0-3]):[0-5]\d$").unwrap();
    static ref REGISTRATION_NUMBER: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9 -]{3,14}$").unwrap();
}

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a hora del día (HH:MM)
pub fn validate_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    if !TIME_OF_DAY.is_match(value) {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        return Err(error);
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ValidationError::new("time"))
}

/// Formato de salida para horas del día
pub fn format_time_of_day(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo (ej. "KA01 AB 1234")
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    if !REGISTRATION_NUMBER.is_match(&value.trim().to_uppercase()) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
