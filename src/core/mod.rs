pub mod engine;
pub mod expander;
pub mod flattener;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{RuleTriple, StanzaDocument, StanzaIssue};
pub use crate::domain::ports::{ExpandConfigProvider, FlattenConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
