use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::info;

use crate::{
    db::DbPool,
    error::{is_unique_violation, AppError},
    models::account::{AccountIn, AccountOut, AccountUpdate},
};

const ACCOUNT_COLUMNS: &str = "id, username, first_name, last_name, email, current_ride";

#[derive(Clone)]
pub struct AccountQueries {
    pool: DbPool,
}

impl AccountQueries {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, account: &AccountIn) -> Result<AccountOut, AppError> {
        account.validate()?;
        let hashed_password = hash_password(account.password.clone()).await?;

        let sql = format!(
            "INSERT INTO accounts (username, first_name, last_name, email, hashed_password) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {ACCOUNT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, AccountOut>(&sql)
            .bind(account.username.trim())
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.email.trim())
            .bind(&hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::BadRequest("username is already taken".into())
                } else {
                    err.into()
                }
            })?;

        info!(account_id = created.id, username = %created.username, "account created");
        Ok(created)
    }

    pub async fn get(&self, username: &str) -> Result<AccountOut, AppError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = ?1");
        sqlx::query_as::<_, AccountOut>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("account"))
    }

    pub async fn update(
        &self,
        username: &str,
        patch: &AccountUpdate,
    ) -> Result<AccountOut, AppError> {
        let sql = format!(
            "UPDATE accounts SET first_name = COALESCE(?1, first_name), \
             last_name = COALESCE(?2, last_name), \
             email = COALESCE(?3, email), \
             current_ride = COALESCE(?4, current_ride) \
             WHERE username = ?5 RETURNING {ACCOUNT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, AccountOut>(&sql)
            .bind(&patch.first_name)
            .bind(&patch.last_name)
            .bind(&patch.email)
            .bind(patch.current_ride)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        info!(account_id = updated.id, current_ride = updated.current_ride, "account updated");
        Ok(updated)
    }
}

/// Hashing runs on the blocking pool.
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AppError::Other(anyhow!("password hashing failed: {err}")))
    })
    .await
    .map_err(|err| AppError::Other(err.into()))?
}
