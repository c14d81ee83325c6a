//! # Dovetail Support
//!
//! Shared utilities for the Dovetail DI crates.
//!
//! This crate provides:
//! - Classification of builtin (scalar) type names
//! - Text rendering for error messages

pub mod builtin;
pub mod rendering;

pub use builtin::is_builtin;
