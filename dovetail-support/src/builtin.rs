//! Builtin type classification.
//!
//! A builtin type is a scalar the container can never construct on its own:
//! numbers, booleans, characters and strings. Both the derive macro (at
//! compile time) and descriptor helpers (at runtime) classify parameter
//! types through [`is_builtin`], so the two always agree.

/// Names treated as builtin scalars.
pub const BUILTIN_TYPES: &[&str] = &[
    "bool", "char", "str", "String",
    "i8", "i16", "i32", "i64", "i128", "isize",
    "u8", "u16", "u32", "u64", "u128", "usize",
    "f32", "f64",
];

/// Returns `true` if `name` names a builtin scalar type.
///
/// Only the last path segment is inspected, so `std::string::String`
/// and `String` classify the same way.
///
/// # Examples
/// ```
/// use dovetail_support::builtin::is_builtin;
///
/// assert!(is_builtin("u32"));
/// assert!(is_builtin("alloc::string::String"));
/// assert!(!is_builtin("Engine"));
/// ```
pub fn is_builtin(name: &str) -> bool {
    let last = name.rsplit("::").next().unwrap_or(name).trim();
    BUILTIN_TYPES.contains(&last)
}
