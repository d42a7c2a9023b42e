//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Random bytes and opaque tokens
//! - Clear-text password policy, zeroization and Argon2id hashing
//! - Bearer token extraction from request headers

pub mod bearer;
pub mod crypto;
pub mod password;
