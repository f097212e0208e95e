//! Shuttle Rides
//!
//! Backend de suscripciones a rutas de van: plantillas de ruta, assignments
//! diarios de conductores con seguimiento de progreso parada a parada y
//! suscripciones de pasajeros con sus rides.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
