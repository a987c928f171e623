/// API middleware
///
/// - `security`: security headers applied to every response

pub mod security;
