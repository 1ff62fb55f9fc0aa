//! Core use-case services.
//!
//! # Responsibility
//! - Own the database connection for the lifetime of a session.
//! - Orchestrate repository calls into the CRUD entry points used by callers.

pub mod store;
