//! Role names carried in access-token claims.

/// Back-office administrators. Unmetered and allowed to publish series.
pub const ROLE_ADMIN: &str = "admin";

/// Regular library members. Metered against quota and credits.
pub const ROLE_USER: &str = "user";
