//! Container configuration.
//!
//! Settings can be built in code or deserialized from the application's
//! own configuration; every field has a default.

use serde::Deserialize;

/// Tunables for a [`Container`](crate::container::Container).
///
/// # Examples
/// ```
/// use dovetail_container::settings::ContainerSettings;
///
/// let settings = ContainerSettings::default().allow_override(false);
/// assert!(!settings.allow_override);
/// assert_eq!(settings.max_suggestions, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Re-registering an identifier replaces the old binding.
    /// When disabled, it fails with `AlreadyRegistered`.
    pub allow_override: bool,
    /// Maximum number of "did you mean" entries in not-found errors.
    pub max_suggestions: usize,
}

impl ContainerSettings {
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            allow_override: true,
            max_suggestions: 3,
        }
    }
}
