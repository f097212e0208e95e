//! Services module
//!
//! Lógica de negocio pura: motor de progreso de assignments, helpers de
//! paradas de ruta y ledger de suscripciones. Los controladores orquestan
//! estos servicios con los repositorios.

pub mod auth_service;
pub mod progress_engine;
pub mod route_stops;
pub mod subscription_ledger;
