/// User model and database operations
///
/// Users are either NGOs (campaign creators) or donors. Passwords are stored
/// only as Argon2id hashes; the optional `refresh_token` column holds the
/// currently valid refresh token so logout can invalidate a session.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('ngo', 'donor');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(64) NOT NULL UNIQUE,
///     email CITEXT NOT NULL UNIQUE,
///     full_name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'donor',
///     refresh_token TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use donatehub_shared::models::user::{User, CreateUser, UserRole};
/// use donatehub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "redcrescent".to_string(),
///     email: "contact@redcrescent.org".to_string(),
///     full_name: "Red Crescent".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Ngo,
/// }).await?;
///
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of a user account
///
/// NGOs create and manage campaigns; donors fund them. The role is fixed at
/// registration and drives every authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Creates campaigns, views donations to its own campaigns
    Ngo,

    /// Makes donations, views its own donation history
    Donor,
}

impl UserRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Ngo => "ngo",
            UserRole::Donor => "donor",
        }
    }

    /// Parses a role from its wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ngo" => Some(UserRole::Ngo),
            "donor" => Some(UserRole::Donor),
            _ => None,
        }
    }
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Email address (case-insensitive via CITEXT), unique
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role (ngo or donor)
    pub role: UserRole,

    /// Currently valid refresh token, None when logged out
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub role: UserRole,
}

/// Per-role user counts for platform statistics
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounts {
    pub total: i64,
    pub ngos: i64,
    pub donors: i64,
}

const USER_COLUMNS: &str =
    "id, username, email, full_name, password_hash, role, refresh_token, created_at, updated_at";

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.username)
        .bind(data.email)
        .bind(data.full_name)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username or email
    ///
    /// Login accepts either identifier; email lookup is case-insensitive
    /// (CITEXT column).
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1",
        ))
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a username or email is already taken
    pub async fn exists(pool: &PgPool, username: &str, email: &str) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Updates the user's display name
    pub async fn update_full_name(
        pool: &PgPool,
        id: Uuid,
        full_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET full_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(full_name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces the user's password hash
    pub async fn update_password_hash(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stores the refresh token issued at login
    ///
    /// Pass `None` to invalidate the session (logout).
    pub async fn set_refresh_token(
        pool: &PgPool,
        id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(refresh_token)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts users per role for the public platform statistics
    pub async fn counts_by_role(pool: &PgPool) -> Result<UserCounts, sqlx::Error> {
        let (total, ngos, donors): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE role = 'ngo'),
                COUNT(*) FILTER (WHERE role = 'donor')
            FROM users
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(UserCounts { total, ngos, donors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::parse("ngo"), Some(UserRole::Ngo));
        assert_eq!(UserRole::parse("donor"), Some(UserRole::Donor));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::Ngo.as_str(), "ngo");
        assert_eq!(UserRole::Donor.as_str(), "donor");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "donor1".to_string(),
            email: "donor1@example.com".to_string(),
            full_name: "Donor One".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Donor,
            refresh_token: Some("token".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("refreshToken"));
        assert!(json.contains("\"fullName\""));
    }

    // Integration tests for database operations are in donatehub-api/tests
}
