//! # Sanduq Support
//!
//! Shared utilities for the Sanduq container crates.
//!
//! This crate provides:
//! - Type name shortening for shape-mismatch messages
//! - "Did you mean" suggestions for missing resource names

pub mod rendering;
