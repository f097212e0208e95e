//! DTOs de la API
//!
//! Requests y responses en camelCase para los frontends de conductor,
//! pasajero y admin.

pub mod api_response;
pub mod assignment_dto;
pub mod auth_dto;
pub mod driver_dto;
pub mod route_dto;
pub mod subscription_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
