//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A stored short code to URL mapping
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewShortLink`] carries only the fields the caller chooses, the store fills
//! in `id` and `created_at`.

pub mod link;

pub use link::{NewShortLink, ShortLink};
