//! # Dovetail — Dependency Injection Container for Rust
//!
//! A small container that maps string identifiers to factories and
//! builds everything else from type descriptors: every constructor
//! parameter naming another type is resolved recursively.
//!
//! ```rust,ignore
//! use dovetail::prelude::*;
//!
//! #[derive(Injectable)]
//! struct Wheel;
//!
//! #[derive(Injectable)]
//! struct Car {
//!     wheel: Wheel,
//! }
//!
//! let container = Container::new();
//! let car: Car = container.resolve()?;
//! ```
//!
//! Types with builtin constructor parameters, interfaces and anything
//! that needs outside configuration are registered explicitly:
//!
//! ```rust,ignore
//! container.register("Database", |_| Database::connect("postgres://localhost"))?;
//! ```

pub use dovetail_container::*;
pub use dovetail_derive::*;
pub use dovetail_support::*;

/// Everything needed to declare types and resolve them.
pub mod prelude {
    pub use dovetail_container::prelude::*;
    pub use dovetail_derive::Injectable;
}
