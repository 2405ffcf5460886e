//! Utility functions for code generation, request identity and database errors.
//!
//! - [`code_generator`] - Short code generation
//! - [`client_ip`] - Client identity extraction from the connection
//! - [`db_error`] - Database error classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
