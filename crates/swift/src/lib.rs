//! swift-client: HTTP client for Swift-compatible object storage
//!
//! This crate provides the implementation of the ObjectStore trait
//! using reqwest. It authenticates with a username and password, keeps the
//! resulting session, and maps each storage operation to one HTTP request.

pub mod auth;
pub mod client;
pub mod config;
pub mod transfer;

pub use auth::{Credentials, Session};
pub use client::{DEFAULT_CONTENT_TYPE, SwiftClient};
pub use config::ClientConfig;
pub use transfer::CHUNK_SIZE;
