use crate::domain::model::StanzaIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("IO error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid list file '{path}' at line {line}: '{content}' (one value per line)")]
    ListFormatError {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Stanza document is invalid: {} structural error(s)", .issues.len())]
    StanzaValidationError { issues: Vec<StanzaIssue> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Validation,
    Configuration,
    Io,
    Output,
}

impl RuleError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError { .. } => ErrorCategory::Io,
            Self::CsvError(_) => ErrorCategory::Output,
            Self::ListFormatError { .. } => ErrorCategory::Input,
            Self::StanzaValidationError { .. } => ErrorCategory::Validation,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError { path, source } => {
                format!("Could not access '{}': {}", path, source)
            }
            Self::CsvError(e) => format!("Failed to write the rule list: {}", e),
            Self::ListFormatError { path, line, content } => format!(
                "Invalid config '{}': line {} ('{}') holds more than one value",
                path, line, content
            ),
            Self::StanzaValidationError { issues } => {
                let fatal = issues.iter().filter(|i| i.is_fatal()).count();
                format!(
                    "Stanza config has {} error(s); no rules were written",
                    fatal
                )
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Option '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Put exactly one value per line in list files, without spaces or commas"
            }
            ErrorCategory::Validation => {
                "Give every destination line at least one port and start the file with a [source] header"
            }
            ErrorCategory::Configuration => "Check the command line options and the --config file",
            ErrorCategory::Io => "Check that the file exists and that its directory is writable",
            ErrorCategory::Output => "Check free disk space and permissions on the output path",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
