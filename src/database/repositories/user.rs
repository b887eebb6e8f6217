//! User repository implementation

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::database::store::UserStore;
use crate::models::user::{NewUser, UpdateProfileRequest, User, UserRole};
use crate::utils::errors::{is_unique_violation, CourtsideError, Result};

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, address, avatar_url, role, \
                            email_verified, renewal_date, qr_code, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Create a new user
    async fn create(&self, request: NewUser) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, phone, address, role, email_verified, renewal_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&request.phone)
        .bind(&request.address)
        .bind(request.role.as_str())
        .bind(request.renewal_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CourtsideError::Conflict(format!("Email {} is already registered", request.email))
            } else {
                e.into()
            }
        })?;

        Ok(user)
    }

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_by("email", email).await
    }

    async fn find_by_qr_code(&self, code: &str) -> Result<Option<User>> {
        self.fetch_one_by("qr_code", code).await
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ANY($1)",
            USER_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// List all users with pagination
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email_verified = TRUE ORDER BY name ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update profile fields that are present in the request
    async fn update_profile(&self, id: i64, request: UpdateProfileRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                avatar_url = COALESCE($5, avatar_url),
                updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.phone)
        .bind(request.address)
        .bind(request.avatar_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| CourtsideError::not_found("User", id))
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CourtsideError::not_found("User", id));
        }
        Ok(())
    }

    async fn activate(&self, id: i64, renewal_date: NaiveDate) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email_verified = TRUE,
                role = CASE WHEN role = $3 THEN $4 ELSE role END,
                renewal_date = $2,
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(renewal_date)
        .bind(UserRole::User.as_str())
        .bind(UserRole::Member.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| CourtsideError::not_found("User", id))
    }

    async fn set_qr_code_if_absent(&self, id: i64, code: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET qr_code = $2, updated_at = $3 WHERE id = $1 AND qr_code IS NULL",
        )
        .bind(id)
        .bind(code)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CourtsideError::Conflict("QR code collision".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(result.rows_affected() == 1)
    }

    /// Count total users
    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn count_active(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email_verified = TRUE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
