//! Bijoux server library.
//!
//! This crate provides the server functionality as a library, allowing the
//! persistence layer to be exercised by integration tests and reused by the
//! CLI migration tool.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
