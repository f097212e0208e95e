//! Configuración leída del entorno: servidor, almacenamiento, JWT,
//! reembolsos y pool de PostgreSQL.

pub mod database;
pub mod environment;

pub use environment::*;
