// Public tier: no credential required
pub mod auth;
