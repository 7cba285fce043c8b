//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a configuration value.
///
/// An unset variable without a default is an error naming both the variable
/// and the config `field` it appeared in. Values without `${` are returned
/// as-is, so a literal `$` in them is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar(String);
