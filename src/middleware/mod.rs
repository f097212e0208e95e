//! Middleware HTTP: JWT y guardas por rol, CORS y límite de peticiones
//! en las rutas públicas de autenticación.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::*;
pub use cors::*;
pub use rate_limit::*;
