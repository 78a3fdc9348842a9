use std::{fmt, str::FromStr};

use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app_error::AppError;

pub const ROLE_HEADER: &str = "x-user-role";
pub const NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Waiter,
    Chef,
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "waiter" => Ok(Role::Waiter),
            "chef" | "chief" => Ok(Role::Chef),
            _ => Err(AppError::Unauthorized),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Waiter => "waiter",
            Role::Chef => "chef",
        };
        f.write_str(name)
    }
}

/// Who is calling, passed explicitly to everything that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Role,
    pub display_name: String,
}

impl Session {
    pub fn new(role: Role, display_name: impl Into<String>) -> Self {
        Self {
            token: None,
            role,
            display_name: display_name.into(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads the session the browser panel attaches to every request.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let role: Role = headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?
            .parse()?;

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from);

        let display_name = headers
            .get(NAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .unwrap_or_else(|| role.to_string());

        Ok(Self {
            token,
            role,
            display_name,
        })
    }

    pub fn is_one_of(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Carts belong to one signed-in user, so they are keyed by the bearer
    /// token. Display names are not unique and never identify a cart.
    pub fn cart_key(&self) -> Result<String, AppError> {
        self.token
            .as_ref()
            .map(|token| format!("token:{}", token))
            .ok_or(AppError::Unauthorized)
    }
}
