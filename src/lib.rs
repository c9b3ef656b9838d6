//! Taita Core - multi-tenant blogging platform backend
//!
//! REST API for blogs, posts, pages, taxonomies, menus, comments, media
//! and settings, with OTP-verified commenting and payment webhooks.

pub mod api;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod email;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
