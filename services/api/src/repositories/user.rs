//! User repository for credential storage and lockout state

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, User, UserRole, UserStatus};

/// Consecutive failed logins after which an account locks
pub const MAX_FAILED_ATTEMPTS: i64 = 5;

/// Username created on first run when absent
pub const BOOTSTRAP_USERNAME: &str = "phanendra";
const BOOTSTRAP_PASSWORD: &str = "123456";

const USER_COLUMNS: &str =
    "id, username, password_hash, role, status, failed_attempts, last_login";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with a salted one-way password hash
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.username);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.clone(),
            password_hash,
            role: new_user.role,
            status: UserStatus::Active,
            failed_attempts: 0,
            last_login: None,
        };

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, status, failed_attempts, last_login)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.status)
        .bind(user.failed_attempts)
        .bind(user.last_login)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verify a user's password
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Record a failed login attempt and return the new counter value
    ///
    /// The increment and the conditional lock happen in one atomic
    /// statement, so concurrent failures for the same user cannot
    /// under-count the attempts.
    pub async fn record_failed_attempt(&self, username: &str) -> Result<i64> {
        // RETURNING ties the reported count to this very increment, so
        // concurrent failures each see their own post-increment value
        let attempts: i64 = sqlx::query_scalar(
            "UPDATE users
             SET failed_attempts = failed_attempts + 1,
                 status = CASE WHEN failed_attempts + 1 >= ? THEN 'locked' ELSE status END
             WHERE username = ?
             RETURNING failed_attempts",
        )
        .bind(MAX_FAILED_ATTEMPTS)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempts)
    }

    /// Reset the failure counter and stamp the last login time
    pub async fn record_successful_login(&self, username: &str) -> Result<()> {
        sqlx::query("UPDATE users SET failed_attempts = 0, last_login = ? WHERE username = ?")
            .bind(Utc::now())
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create the bootstrap admin account on first run; idempotent
    pub async fn bootstrap_admin(&self) -> Result<()> {
        if self.find_by_username(BOOTSTRAP_USERNAME).await?.is_some() {
            info!("Bootstrap admin '{}' already exists", BOOTSTRAP_USERNAME);
            return Ok(());
        }

        self.create(&NewUser {
            username: BOOTSTRAP_USERNAME.to_string(),
            password: BOOTSTRAP_PASSWORD.to_string(),
            role: UserRole::Admin,
        })
        .await?;

        info!("Bootstrap admin user created: {}", BOOTSTRAP_USERNAME);
        Ok(())
    }
}
