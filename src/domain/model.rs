use serde::Serialize;
use std::fmt;

/// One destination and the ports opened to it inside a stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationLine {
    pub destination: String,
    pub ports: Vec<String>,
}

impl fmt::Display for DestinationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.destination)?;
        for port in &self.ports {
            write!(f, ",{}", port)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub source: String,
    pub destinations: Vec<DestinationLine>,
}

impl Stanza {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destinations: Vec::new(),
        }
    }

    pub fn header(&self) -> String {
        format!("[{}]", self.source)
    }
}

/// Grouped intermediate form: `[source]` headers followed by
/// `destination,port,...` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StanzaDocument {
    pub stanzas: Vec<Stanza>,
}

impl StanzaDocument {
    /// Source, then destination, then port order.
    pub fn rule_triples(&self) -> Vec<RuleTriple> {
        self.stanzas
            .iter()
            .flat_map(|stanza| {
                stanza.destinations.iter().flat_map(move |line| {
                    line.ports.iter().map(move |port| RuleTriple {
                        source: stanza.source.clone(),
                        destination: line.destination.clone(),
                        port: port.clone(),
                    })
                })
            })
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.stanzas
            .iter()
            .flat_map(|s| &s.destinations)
            .map(|d| d.ports.len())
            .sum()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StanzaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stanza in &self.stanzas {
            writeln!(f, "{}", stanza.header())?;
            for line in &stanza.destinations {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

/// The unit consumed by the downstream checker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuleTriple {
    pub source: String,
    pub destination: String,
    pub port: String,
}

impl RuleTriple {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for RuleTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.source, self.destination, self.port)
    }
}

/// A structural problem found while flattening a stanza document.
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StanzaIssue {
    /// Line had no usable destination token. Skipped, never fatal.
    InvalidDestination { line: usize, source: String },
    MissingPorts {
        line: usize,
        source: String,
        destination: String,
    },
    /// Destination line seen before any `[source]` header.
    MissingStanzaHeader { line: usize, content: String },
}

impl StanzaIssue {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidDestination { .. })
    }
}

impl fmt::Display for StanzaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDestination { line, source } => write!(
                f,
                "line {}: invalid destination for stanza '{}'",
                line, source
            ),
            Self::MissingPorts {
                line,
                source,
                destination,
            } => write!(
                f,
                "line {}: no port for rule '{}' -> '{}'",
                line, source, destination
            ),
            Self::MissingStanzaHeader { line, content } => write!(
                f,
                "line {}: destination '{}' appears before any [source] header",
                line, content
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> StanzaDocument {
        StanzaDocument {
            stanzas: vec![
                Stanza {
                    source: "a".to_string(),
                    destinations: vec![
                        DestinationLine {
                            destination: "d1".to_string(),
                            ports: vec!["80".to_string(), "443".to_string()],
                        },
                        DestinationLine {
                            destination: "d2".to_string(),
                            ports: vec!["22".to_string()],
                        },
                    ],
                },
                Stanza::new("b"),
            ],
        }
    }

    #[test]
    fn test_render_stanza_document() {
        assert_eq!(
            sample_document().render(),
            "[a]\nd1,80,443\nd2,22\n[b]\n"
        );
    }

    #[test]
    fn test_rule_triples_follow_document_order() {
        let doc = sample_document();
        let rules: Vec<String> = doc.rule_triples().iter().map(|r| r.to_string()).collect();

        assert_eq!(rules, vec!["a,d1,80", "a,d1,443", "a,d2,22"]);
        assert_eq!(doc.rule_count(), 3);
    }

    #[test]
    fn test_only_invalid_destination_is_recoverable() {
        let warning = StanzaIssue::InvalidDestination {
            line: 1,
            source: "a".to_string(),
        };
        let missing = StanzaIssue::MissingStanzaHeader {
            line: 1,
            content: "d1,80".to_string(),
        };

        assert!(!warning.is_fatal());
        assert!(missing.is_fatal());
    }
}
