use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountIn {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl AccountIn {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::BadRequest("username is required".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("password is required".into()));
        }
        if !self.email.contains('@') {
            return Err(AppError::BadRequest("email looks invalid".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AccountOut {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub current_ride: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub current_ride: Option<bool>,
}
