//! Modelo de User
//!
//! Pasajeros, conductores y administradores comparten la tabla users;
//! el rol decide qué endpoints pueden usar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Rider,
    Driver,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Rider => "rider",
            UserRole::Driver => "driver",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rider" => Some(UserRole::Rider),
            "driver" => Some(UserRole::Driver),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub license_number: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
        phone: Option<String>,
        license_number: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            phone,
            license_number,
            active: true,
            created_at: Utc::now(),
        }
    }
}
