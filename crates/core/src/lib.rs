//! Bijoux Core - Shared domain types.
//!
//! This crate provides the catalog and order types used across the Bijoux
//! components:
//! - `server` - JSON API backing the storefront and admin panel
//! - `cli` - Command-line tools for data migration
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP. Merge semantics for partial updates live here so both
//! storage backends apply exactly the same rules.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, settings, orders and their statuses
//! - [`id`] - Opaque identifier generation
//! - [`lenient`] - Forgiving numeric parsing for form input

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod id;
pub mod lenient;
pub mod types;

pub use types::*;
