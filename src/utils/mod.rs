//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT, distancias y enumeración de calendarios.

pub mod errors;
pub mod geo;
pub mod jwt;
pub mod schedule;
pub mod validation;
