//! Structural validation of a loaded [`Config`] — the invalid-regex and
//! invalid-enum-value failures spec.md §7 classifies as `ConfigError`.

use nextver_core::Config;

use crate::errors::ConfigProviderResult;

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks every regex the config supplies actually compiles and every
/// semver-shaped field actually parses, without resolving a branch (that is
/// core's `Builder::resolve`'s job).
pub fn validate(config: &Config) -> ConfigProviderResult<ValidationResult> {
    let mut result = ValidationResult::default();

    if let Err(e) = regex::Regex::new(config.tag_prefix()) {
        result
            .errors
            .push(format!("invalid tag_prefix regex '{}': {e}", config.tag_prefix()));
    }

    if let Err(e) = config.base_version() {
        result.errors.push(format!("invalid base_version: {e}"));
    }
    if let Err(e) = config.next_version() {
        result.errors.push(format!("invalid next_version: {e}"));
    }

    for (name, branch) in &config.branches {
        if let Some(pattern) = &branch.regex {
            if let Err(e) = regex::Regex::new(pattern) {
                result
                    .errors
                    .push(format!("invalid regex for branch config '{name}': {e}"));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
