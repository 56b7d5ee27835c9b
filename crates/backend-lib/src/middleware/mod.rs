// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the Gatehouse credential service.

pub mod access_gate;

pub use access_gate::{
    authenticate_request, clear_session_cookie, flash_context, session_cookie,
    session_id_from_headers, AuthContext, SESSION_COOKIE_NAME,
};
