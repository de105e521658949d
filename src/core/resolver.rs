use crate::core::Storage;
use crate::utils::error::{Result, RuleError};

/// Extension that marks an argument as a list file rather than an inline list.
pub const LIST_FILE_EXTENSION: &str = "config";

/// True when the text after the last `.` is the list file extension. An
/// argument with no dot at all is compared whole, so a bare `config` counts.
pub fn is_list_file(arg: &str) -> bool {
    arg.rsplit('.').next() == Some(LIST_FILE_EXTENSION)
}

/// Splits an inline argument on commas. Pieces are kept as-is, untrimmed.
pub fn split_inline(arg: &str) -> Vec<String> {
    arg.split(',').map(str::to_string).collect()
}

/// Parses list file content: empty and `#` lines are skipped, every other
/// line must be a single value with no whitespace or comma. A line holding
/// only whitespace is malformed, not blank.
pub fn parse_list_file(path: &str, content: &str) -> Result<Vec<String>> {
    let mut values = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains(char::is_whitespace) || line.contains(',') {
            return Err(RuleError::ListFormatError {
                path: path.to_string(),
                line: index + 1,
                content: line.to_string(),
            });
        }

        values.push(line.to_string());
    }

    Ok(values)
}

/// Turns a CLI value argument into an ordered value sequence.
pub struct ValueResolver<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> ValueResolver<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub async fn resolve(&self, arg: &str) -> Result<Vec<String>> {
        if is_list_file(arg) {
            tracing::debug!("Reading list file '{}'", arg);
            let content = self.storage.read_to_string(arg).await?;
            let values = parse_list_file(arg, &content)?;
            tracing::debug!("Read {} value(s) from '{}'", values.len(), arg);
            Ok(values)
        } else {
            Ok(split_inline(arg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    #[test]
    fn test_is_list_file() {
        assert!(is_list_file("source.config"));
        assert!(is_list_file("lists/dest.config"));
        assert!(is_list_file("config"));
        assert!(is_list_file(".config"));
        assert!(!is_list_file("10.0.0.1,10.0.0.2"));
        assert!(!is_list_file("ports.conf"));
        assert!(!is_list_file("config.bak"));
    }

    #[test]
    fn test_split_inline_keeps_order_and_whitespace() {
        assert_eq!(split_inline("80,443,22"), vec!["80", "443", "22"]);
        assert_eq!(split_inline("a, b"), vec!["a", " b"]);
        assert_eq!(split_inline("single"), vec!["single"]);
    }

    #[test]
    fn test_parse_list_file_skips_comments_and_blanks() {
        let content = "# sources\n10.0.0.1\n\n\n#10.0.0.9\n10.0.0.2\n";
        let values = parse_list_file("source.config", content).unwrap();
        assert_eq!(values, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_parse_list_file_rejects_whitespace_only_line() {
        let err = parse_list_file("source.config", "a\n   \nb\n").unwrap_err();
        match err {
            RuleError::ListFormatError { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "   ");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_file_handles_crlf() {
        let values = parse_list_file("ports.config", "80\r\n443\r\n").unwrap();
        assert_eq!(values, vec!["80", "443"]);
    }

    #[test]
    fn test_parse_list_file_rejects_comma() {
        let err = parse_list_file("dest.config", "d1\nd2,d3\n").unwrap_err();
        match err {
            RuleError::ListFormatError { path, line, content } => {
                assert_eq!(path, "dest.config");
                assert_eq!(line, 2);
                assert_eq!(content, "d2,d3");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_file_rejects_space() {
        assert!(parse_list_file("dest.config", "a b\n").is_err());
        assert!(parse_list_file("dest.config", "a\tb\n").is_err());
    }

    #[tokio::test]
    async fn test_resolver_reads_list_files_through_storage() {
        let storage = MemoryStorage::new().with_file("ports.config", "80\n#ssh\n443\n");
        let resolver = ValueResolver::new(&storage);

        assert_eq!(resolver.resolve("ports.config").await.unwrap(), vec!["80", "443"]);
        assert_eq!(resolver.resolve("22,8080").await.unwrap(), vec!["22", "8080"]);
        assert!(resolver.resolve("missing.config").await.is_err());
    }
}
