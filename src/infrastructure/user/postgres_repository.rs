//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{NewUser, RepositoryError, User, UserId, UserRepository};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get user by email", e))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, first_name, last_name, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create user", e))?;

        row_to_user(&row)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;

        Ok(())
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::other(format!("Failed to decode user row: {}", e));

    let id: i64 = row.try_get("id").map_err(decode)?;
    let email: String = row.try_get("email").map_err(decode)?;
    let password_hash: String = row.try_get("password_hash").map_err(decode)?;
    let first_name: String = row.try_get("first_name").map_err(decode)?;
    let last_name: String = row.try_get("last_name").map_err(decode)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(User::from_storage(
        UserId::new(id),
        email,
        password_hash,
        first_name,
        last_name,
        created_at,
    ))
}

/// Translate a driver error into the repository's typed failure
fn map_sqlx_error(action: &str, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::unique_violation(db_err.constraint().unwrap_or(EMAIL_CONSTRAINT))
        }
        _ => RepositoryError::other(format!("Failed to {}: {}", action, err)),
    }
}
