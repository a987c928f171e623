/// Database models for DonateHub
///
/// This module contains all database models and their operations.
///
/// # Models
///
/// - `user`: User accounts (NGO or donor) and authentication state
/// - `campaign`: Fundraising campaigns with the materialized `raised_amount`
/// - `donation`: The append-only donation ledger and its aggregation queries
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
///     username: "donor1".to_string(),
///     email: "donor1@example.com".to_string(),
///     full_name: "Donor One".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Donor,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod campaign;
pub mod donation;
pub mod user;
