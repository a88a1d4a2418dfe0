//! # EventHub API Server Library
//!
//! Core of the EventHub HTTP server, split out of the binary so tests can
//! build the router directly.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Authentication, validation and error-detail layers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
