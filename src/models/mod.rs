//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos del dominio. Las filas
//! de PostgreSQL se convierten a estos tipos en los repositorios.

pub mod assignment;
pub mod route_template;
pub mod subscription;
pub mod user;
pub mod vehicle;
