//! Derive macros for Dovetail.
//!
//! Re-exported by the `dovetail` facade; depend on that instead.

pub use dovetail_macros::Injectable;
