//! Cryptographic utilities for Taita Core

pub mod password;
pub mod signature;

pub use password::{hash_password, verify_password};
pub use signature::{hmac_sha256_hex, verify_hmac_sha256};
