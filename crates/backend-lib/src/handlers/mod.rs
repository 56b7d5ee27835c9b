// crates/backend-lib/src/handlers/mod.rs

//! Request handlers.

pub mod pages;
