/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, sessions, and profile management
/// - `campaigns`: Campaign CRUD and public listings
/// - `donations`: The donation ledger and donation views
/// - `dashboard`: Aggregated reporting views

pub mod campaigns;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod users;
