//! # TSA Common Library
//!
//! Shared code for the tweet stance annotation service:
//! - Database initialisation and row models
//! - Bootstrap configuration resolution
//! - Session token signing
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod session;

pub use error::{Error, Result};
