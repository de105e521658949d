use crate::domain::model::{DestinationLine, Stanza, StanzaDocument};

/// True when a destination would not come back as written once its line is
/// flattened: it reads as a comment, is empty, or holds whitespace.
pub fn destination_is_ambiguous(destination: &str) -> bool {
    destination.is_empty()
        || destination.starts_with('#')
        || destination.contains(char::is_whitespace)
}

/// Builds one stanza per source, each holding one line per destination with
/// every port aggregated onto that line.
pub fn expand(sources: &[String], destinations: &[String], ports: &[String]) -> StanzaDocument {
    if ports.is_empty() && !destinations.is_empty() {
        tracing::warn!("No ports given, destination lines will be omitted");
    }

    for destination in destinations
        .iter()
        .filter(|d| destination_is_ambiguous(d))
    {
        tracing::warn!(
            "Destination '{}' will not flatten as written (comment, empty or whitespace)",
            destination
        );
    }

    let stanzas = sources
        .iter()
        .map(|source| Stanza {
            source: source.clone(),
            destinations: if ports.is_empty() {
                Vec::new()
            } else {
                destinations
                    .iter()
                    .map(|destination| DestinationLine {
                        destination: destination.clone(),
                        ports: ports.to_vec(),
                    })
                    .collect()
            },
        })
        .collect();

    StanzaDocument { stanzas }
}
