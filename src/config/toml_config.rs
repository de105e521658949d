use crate::utils::error::{Result, RuleError};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_path, validate_value_arg, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional defaults file shared by both commands. Every field may be
/// overridden on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub expand: Option<ExpandSection>,
    pub flatten: Option<FlattenSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpandSection {
    pub source: Option<String>,
    pub dest: Option<String>,
    pub ports: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlattenSection {
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RuleError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RuleError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        match self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|reason| RuleError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: raw.to_string(),
                    reason,
                }),
            None => Ok(None),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(expand) = &self.expand {
            for (field, value) in [
                ("expand.source", &expand.source),
                ("expand.dest", &expand.dest),
                ("expand.ports", &expand.ports),
            ] {
                if let Some(value) = value {
                    validate_value_arg(field, value)?;
                }
            }
            if let Some(output) = &expand.output {
                validate_path("expand.output", output)?;
            }
        }

        if let Some(flatten) = &self.flatten {
            if let Some(input) = &flatten.input {
                validate_path("flatten.input", input)?;
            }
            if let Some(output) = &flatten.output {
                validate_path("flatten.output", output)?;
            }
        }

        self.log_format()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[expand]
source = "lists/source.config"
dest = "10.0.0.1,10.0.0.2"
ports = "80,443"
output = "web_stanzas"

[flatten]
input = "web_stanzas"
output = "web_rules"

[logging]
verbose = true
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let expand = config.expand.as_ref().unwrap();

        assert_eq!(expand.source.as_deref(), Some("lists/source.config"));
        assert_eq!(expand.ports.as_deref(), Some("80,443"));
        assert_eq!(
            config.flatten.as_ref().unwrap().output.as_deref(),
            Some("web_rules")
        );
        assert!(config.verbose());
        assert_eq!(config.log_format().unwrap(), Some(LogFormat::Json));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.expand.is_none());
        assert!(!config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STANZA_RULES_TEST_PORTS", "22,8080");

        let config = TomlConfig::from_toml_str(
            r#"
[expand]
ports = "${STANZA_RULES_TEST_PORTS}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.expand.unwrap().ports.as_deref(),
            Some("22,8080")
        );

        std::env::remove_var("STANZA_RULES_TEST_PORTS");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(TomlConfig::from_toml_str("[expand]\nsources = \"a\"\n").is_err());
    }

    #[test]
    fn test_invalid_log_format_fails_validation() {
        let config = TomlConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[flatten]\ninput = \"rules_config\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.flatten.unwrap().input.as_deref(),
            Some("rules_config")
        );
    }
}
