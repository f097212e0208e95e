//! Controladores
//!
//! Se construyen por request a partir del `AppState` y devuelven DTOs.

pub mod assignment_controller;
pub mod auth_controller;
pub mod driver_controller;
pub mod route_controller;
pub mod subscription_controller;
pub mod vehicle_controller;
