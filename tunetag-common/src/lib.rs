//! # tunetag Common Library
//!
//! Shared code for the tunetag services including:
//! - Library entity models (songs, labels, label edges)
//! - Database initialization and schema
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
