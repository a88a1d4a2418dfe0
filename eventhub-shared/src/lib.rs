//! # EventHub Shared Library
//!
//! This crate contains the persistence gateway, authentication primitives and
//! mail delivery used by the EventHub API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and relation operations
//! - `auth`: Tokens, password hashing, roles and verification tokens
//! - `db`: Connection pool, migrations and seed data
//! - `mail`: Transactional email (verification, registration confirmation)

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;

/// Current version of the EventHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
