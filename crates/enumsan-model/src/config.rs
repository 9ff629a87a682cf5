//! Per-model configuration.

use serde::{Deserialize, Serialize};

/// What to do with input keys the model does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPolicy {
    /// Drop them.
    #[default]
    Ignore,
    /// Reject the input with `extra_forbidden`.
    Forbid,
    /// Keep them, after the declared fields, without coercion.
    Allow,
}

/// Model-level validation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Handling of undeclared input keys.
    pub extra: ExtraPolicy,
    /// Run type coercion on defaults too. Off by default: defaults are
    /// trusted and only pass through the post-parse hooks.
    pub validate_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ModelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.extra, ExtraPolicy::Ignore);
        assert!(!config.validate_default);
    }

    #[test]
    fn test_parse_forbid() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"extra": "forbid", "validate_default": true}"#).unwrap();
        assert_eq!(config.extra, ExtraPolicy::Forbid);
        assert!(config.validate_default);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(serde_json::from_str::<ModelConfig>(r#"{"strict": true}"#).is_err());
    }
}
