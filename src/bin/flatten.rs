use clap::Parser;
use stanza_rules::config::cli::FlattenArgs;
use stanza_rules::utils::{logger, validation::Validate};
use stanza_rules::{FlattenPipeline, LocalStorage, RuleEngine, RuleError};
use std::process::ExitCode;

fn report_failure(e: &RuleError) -> ExitCode {
    tracing::error!(
        "flatten failed: {} (Category: {:?})",
        e,
        e.category()
    );
    if let RuleError::StanzaValidationError { issues } = e {
        for issue in issues.iter().filter(|i| i.is_fatal()) {
            eprintln!("  {}", issue);
        }
    }
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    ExitCode::FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Usage errors exit with 2, --help with 0.
    let args = FlattenArgs::parse();

    let file_config = match args.common.load_file_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return ExitCode::FAILURE;
        }
    };

    let (verbose, format) = match args.common.logging(file_config.as_ref()) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            return ExitCode::FAILURE;
        }
    };
    logger::init_cli_logger(verbose, format);

    tracing::info!("Processing command line options");
    if let Some(config) = &file_config {
        if let Err(e) = config.validate() {
            return report_failure(&e);
        }
    }

    let settings = args.settings(file_config.as_ref());
    tracing::debug!("Flatten settings: {:?}", settings);
    if let Err(e) = settings.validate() {
        return report_failure(&e);
    }

    let pipeline = FlattenPipeline::new(LocalStorage::new(), settings);
    let engine = RuleEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("Config written to '{}'", output_path);
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}
