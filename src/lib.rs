pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{LocalStorage, MemoryStorage};
pub use crate::config::{ExpandSettings, FlattenSettings};
pub use crate::core::{
    engine::RuleEngine,
    expander::expand,
    flattener::{flatten, parse_stanzas, FlattenReport},
    pipeline::{ExpandPipeline, FlattenPipeline},
    resolver::ValueResolver,
};
pub use crate::domain::model::{DestinationLine, RuleTriple, Stanza, StanzaDocument, StanzaIssue};
pub use crate::utils::error::{ErrorCategory, Result, RuleError};
