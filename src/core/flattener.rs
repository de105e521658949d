use crate::domain::model::{DestinationLine, RuleTriple, Stanza, StanzaDocument, StanzaIssue};
use crate::utils::error::{Result, RuleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    NoCurrentSource,
    /// Index of the stanza receiving destination lines.
    InStanza(usize),
}

/// Everything learned from one pass over a stanza document.
#[derive(Debug, Clone, Default)]
pub struct FlattenReport {
    pub document: StanzaDocument,
    pub issues: Vec<StanzaIssue>,
}

impl FlattenReport {
    pub fn rules(&self) -> Vec<RuleTriple> {
        self.document.rule_triples()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(StanzaIssue::is_fatal)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StanzaIssue> {
        self.issues.iter().filter(|issue| !issue.is_fatal())
    }

    /// Fails if any fatal issue was recorded; otherwise yields every rule.
    pub fn into_result(self) -> Result<Vec<RuleTriple>> {
        if self.has_errors() {
            return Err(RuleError::StanzaValidationError {
                issues: self.issues,
            });
        }
        Ok(self.document.rule_triples())
    }
}

fn header_label(line: &str) -> Option<&str> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        Some(line.trim_start_matches('[').trim_end_matches(']'))
    } else {
        None
    }
}

fn record(issues: &mut Vec<StanzaIssue>, issue: StanzaIssue) {
    if issue.is_fatal() {
        tracing::error!("{}", issue);
    } else {
        tracing::warn!("{}", issue);
    }
    issues.push(issue);
}

/// Parses a stanza document, collecting every structural issue instead of
/// stopping at the first one.
pub fn parse_stanzas(content: &str) -> FlattenReport {
    let mut document = StanzaDocument::default();
    let mut issues = Vec::new();
    let mut state = ParserState::NoCurrentSource;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(label) = header_label(&line) {
            document.stanzas.push(Stanza::new(label));
            state = ParserState::InStanza(document.stanzas.len() - 1);
            continue;
        }

        let ParserState::InStanza(current) = state else {
            record(
                &mut issues,
                StanzaIssue::MissingStanzaHeader {
                    line: line_no,
                    content: line,
                },
            );
            continue;
        };
        let stanza = &mut document.stanzas[current];

        let mut tokens = line.split(',').filter(|token| !token.is_empty());
        let Some(destination) = tokens.next() else {
            record(
                &mut issues,
                StanzaIssue::InvalidDestination {
                    line: line_no,
                    source: stanza.source.clone(),
                },
            );
            continue;
        };

        let ports: Vec<String> = tokens.map(str::to_string).collect();
        if ports.is_empty() {
            record(
                &mut issues,
                StanzaIssue::MissingPorts {
                    line: line_no,
                    source: stanza.source.clone(),
                    destination: destination.to_string(),
                },
            );
            continue;
        }

        stanza.destinations.push(DestinationLine {
            destination: destination.to_string(),
            ports,
        });
    }

    tracing::debug!(
        "Parsed {} stanza(s), {} rule(s), {} issue(s)",
        document.stanzas.len(),
        document.rule_count(),
        issues.len()
    );

    FlattenReport { document, issues }
}

/// Flattens a stanza document into rule triples, failing after the full scan
/// if any destination line was missing ports or a header.
pub fn flatten(content: &str) -> Result<Vec<RuleTriple>> {
    parse_stanzas(content).into_result()
}
