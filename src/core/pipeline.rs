use crate::core::expander::expand;
use crate::core::flattener::parse_stanzas;
use crate::core::resolver::ValueResolver;
use crate::core::{ExpandConfigProvider, FlattenConfigProvider, Pipeline, RuleTriple, StanzaDocument, Storage};
use crate::utils::error::{Result, RuleError};
use async_trait::async_trait;

/// Resolved value sequences feeding the expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandInputs {
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub ports: Vec<String>,
}

/// Build path: value arguments -> stanza document file.
pub struct ExpandPipeline<S: Storage, C: ExpandConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ExpandConfigProvider> ExpandPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage, C: ExpandConfigProvider> Pipeline for ExpandPipeline<S, C> {
    type Extracted = ExpandInputs;
    type Transformed = StanzaDocument;

    fn name(&self) -> &'static str {
        "expand"
    }

    async fn extract(&self) -> Result<ExpandInputs> {
        let resolver = ValueResolver::new(&self.storage);

        let sources = resolver.resolve(self.config.source_arg()).await?;
        let destinations = resolver.resolve(self.config.dest_arg()).await?;
        let ports = resolver.resolve(self.config.ports_arg()).await?;

        tracing::info!(
            "Resolved {} source(s), {} destination(s), {} port(s)",
            sources.len(),
            destinations.len(),
            ports.len()
        );

        Ok(ExpandInputs {
            sources,
            destinations,
            ports,
        })
    }

    async fn transform(&self, data: ExpandInputs) -> Result<StanzaDocument> {
        Ok(expand(&data.sources, &data.destinations, &data.ports))
    }

    async fn load(&self, result: StanzaDocument) -> Result<String> {
        let output_path = self.config.output_path();
        tracing::info!(
            "Writing {} stanza(s) to '{}'",
            result.stanzas.len(),
            output_path
        );

        self.storage
            .write_file(output_path, result.render().as_bytes())
            .await?;
        Ok(output_path.to_string())
    }
}

/// Serializes rules as `source,destination,port` lines without quoting.
pub fn render_rule_list(rules: &[RuleTriple]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for rule in rules {
        writer.serialize(rule)?;
    }

    writer
        .into_inner()
        .map_err(|e| RuleError::CsvError(csv::Error::from(e.into_error())))
}

/// Consume path: stanza document file -> flat rule list file.
pub struct FlattenPipeline<S: Storage, C: FlattenConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: FlattenConfigProvider> FlattenPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[async_trait]
impl<S: Storage, C: FlattenConfigProvider> Pipeline for FlattenPipeline<S, C> {
    type Extracted = String;
    type Transformed = Vec<RuleTriple>;

    fn name(&self) -> &'static str {
        "flatten"
    }

    async fn extract(&self) -> Result<String> {
        tracing::info!("Interpreting config file '{}'", self.config.input_path());
        self.storage.read_to_string(self.config.input_path()).await
    }

    async fn transform(&self, data: String) -> Result<Vec<RuleTriple>> {
        let report = parse_stanzas(&data);

        let warnings = report.warnings().count();
        if warnings > 0 {
            tracing::warn!(
                "Skipped {} line(s) without a destination in '{}'",
                warnings,
                self.config.input_path()
            );
        }

        if report.has_errors() {
            tracing::error!(
                "'{}' has structural errors, not writing any rules",
                self.config.input_path()
            );
        }

        let rules = report.into_result()?;
        tracing::info!("Flattened {} rule(s)", rules.len());
        Ok(rules)
    }

    async fn load(&self, result: Vec<RuleTriple>) -> Result<String> {
        let output_path = self.config.output_path();
        let data = render_rule_list(&result)?;

        self.storage.write_file(output_path, &data).await?;
        Ok(output_path.to_string())
    }
}
