use serde::Deserialize;

/// Input sanitization settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizationConfig {
    /// Ceiling for a sanitized string, in UTF-16 code units.
    pub max_length: usize,
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self { max_length: 1000 }
    }
}
