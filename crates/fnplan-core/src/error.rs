//! Error types for deployment config resolution.

use thiserror::Error;

/// Result type alias for resolution operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation failures raised while resolving a deployment config.
///
/// Every variant aborts assembly; no partial descriptor is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Messages name fields by their config key (`'event_type'`,
    /// `'base_code_path'`), which are snake_case.
    #[error("{0}")]
    MissingRequiredField(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("invalid network config: {0}")]
    InvalidNetworkConfig(String),

    #[error("invalid concurrency policy: {0}")]
    InvalidConcurrencyPolicy(String),

    #[error("invalid function config: {0}")]
    InvalidFunctionConfig(String),

    #[error("unresolved reference: parameter '{0}' does not exist")]
    UnresolvedReference(String),
}

impl ConfigError {
    /// Short machine-readable name of the violated rule class.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::MissingRequiredField(_) => "missing_required_field",
            ConfigError::EntryNotFound(_) => "entry_not_found",
            ConfigError::InvalidNetworkConfig(_) => "invalid_network_config",
            ConfigError::InvalidConcurrencyPolicy(_) => "invalid_concurrency_policy",
            ConfigError::InvalidFunctionConfig(_) => "invalid_function_config",
            ConfigError::UnresolvedReference(_) => "unresolved_reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_is_verbatim() {
        let err = ConfigError::MissingRequiredField(
            "'event_type' is required if 'entry' is not defined".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "'event_type' is required if 'entry' is not defined"
        );
        assert_eq!(err.kind(), "missing_required_field");
    }

    #[test]
    fn unresolved_reference_names_parameter() {
        let err = ConfigError::UnresolvedReference("log-forwarder-lambda-arn".to_string());
        assert!(err.to_string().contains("log-forwarder-lambda-arn"));
    }
}
