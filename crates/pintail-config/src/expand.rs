//! Environment and home-directory expansion for configuration values.

use crate::ConfigError;

/// Expand `${VAR}`, `$VAR` and a leading `~` in a configuration value.
///
/// `field` names the option being expanded and is only used for error
/// reporting.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::full(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
