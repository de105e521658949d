#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::{ExpandConfigProvider, FlattenConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{validate_distinct_paths, validate_path, validate_value_arg, Validate};

pub const DEFAULT_SOURCE: &str = "source.config";
pub const DEFAULT_DEST: &str = "dest.config";
pub const DEFAULT_PORTS: &str = "ports.config";
pub const DEFAULT_EXPAND_OUTPUT: &str = "output_config";
pub const DEFAULT_FLATTEN_INPUT: &str = "config";

/// Flatten writes next to its input unless told otherwise.
pub fn default_flatten_output(input: &str) -> String {
    format!("{}_out", input)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandSettings {
    pub source: String,
    pub dest: String,
    pub ports: String,
    pub output: String,
}

impl Default for ExpandSettings {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            dest: DEFAULT_DEST.to_string(),
            ports: DEFAULT_PORTS.to_string(),
            output: DEFAULT_EXPAND_OUTPUT.to_string(),
        }
    }
}

impl ExpandConfigProvider for ExpandSettings {
    fn source_arg(&self) -> &str {
        &self.source
    }

    fn dest_arg(&self) -> &str {
        &self.dest
    }

    fn ports_arg(&self) -> &str {
        &self.ports
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

impl Validate for ExpandSettings {
    fn validate(&self) -> Result<()> {
        validate_value_arg("source", &self.source)?;
        validate_value_arg("dest", &self.dest)?;
        validate_value_arg("ports", &self.ports)?;
        validate_path("output", &self.output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenSettings {
    pub input: String,
    pub output: String,
}

impl FlattenSettings {
    pub fn for_input(input: impl Into<String>) -> Self {
        let input = input.into();
        let output = default_flatten_output(&input);
        Self { input, output }
    }
}

impl Default for FlattenSettings {
    fn default() -> Self {
        Self::for_input(DEFAULT_FLATTEN_INPUT)
    }
}

impl FlattenConfigProvider for FlattenSettings {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

impl Validate for FlattenSettings {
    fn validate(&self) -> Result<()> {
        validate_path("iconfig", &self.input)?;
        validate_path("oconfig", &self.output)?;
        validate_distinct_paths("oconfig", &self.input, &self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_defaults() {
        let settings = ExpandSettings::default();
        assert_eq!(settings.source_arg(), "source.config");
        assert_eq!(settings.dest_arg(), "dest.config");
        assert_eq!(settings.ports_arg(), "ports.config");
        assert_eq!(settings.output_path(), "output_config");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_flatten_output_follows_input() {
        assert_eq!(FlattenSettings::default().output_path(), "config_out");
        assert_eq!(FlattenSettings::for_input("web").output_path(), "web_out");
    }

    #[test]
    fn test_flatten_rejects_same_input_and_output() {
        let settings = FlattenSettings {
            input: "config".to_string(),
            output: "config".to_string(),
        };
        assert!(settings.validate().is_err());
    }
}
