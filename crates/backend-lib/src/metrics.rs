// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const ACCOUNT_CREATED: &str = "account.created";
pub const SIGNIN_SUCCESS: &str = "signin.success";
pub const SIGNIN_FAILURE: &str = "signin.failure";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_DESTROYED: &str = "session.destroyed";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSIONS_ACTIVE: &str = "session.active";
