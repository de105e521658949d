use crate::config::toml_config::TomlConfig;
use crate::config::{
    default_flatten_output, ExpandSettings, FlattenSettings, DEFAULT_DEST, DEFAULT_EXPAND_OUTPUT,
    DEFAULT_FLATTEN_INPUT, DEFAULT_PORTS, DEFAULT_SOURCE,
};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser};

/// Logging and defaults-file options shared by both commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// TOML file providing defaults for any option not given here
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format: compact or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl CommonArgs {
    pub fn load_file_config(&self) -> Result<Option<TomlConfig>> {
        self.config.as_deref().map(TomlConfig::from_file).transpose()
    }

    /// Command line wins over the file, the file over built-in defaults.
    pub fn logging(&self, file: Option<&TomlConfig>) -> Result<(bool, LogFormat)> {
        let verbose = self.verbose || file.is_some_and(TomlConfig::verbose);
        let format = match self.log_format {
            Some(format) => format,
            None => match file {
                Some(file) => file.log_format()?.unwrap_or_default(),
                None => LogFormat::default(),
            },
        };
        Ok((verbose, format))
    }
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "expand")]
#[command(about = "Expand source, destination and port lists into a stanza config")]
#[command(
    long_about = "Expand source, destination and port lists into a stanza config.\n\
                  Each of -s/-d/-p takes either a comma separated list (no whitespace) \
                  or a path to a .config list file with one value per line."
)]
pub struct ExpandArgs {
    /// Source addresses: inline list or .config file [default: source.config]
    #[arg(short = 's', long = "source")]
    pub source: Option<String>,

    /// Destination addresses: inline list or .config file [default: dest.config]
    #[arg(short = 'd', long = "dest")]
    pub dest: Option<String>,

    /// Ports: inline list or .config file [default: ports.config]
    #[arg(short = 'p', long = "ports")]
    pub ports: Option<String>,

    /// Stanza config to write [default: output_config]
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ExpandArgs {
    pub fn settings(&self, file: Option<&TomlConfig>) -> ExpandSettings {
        let section = file.and_then(|f| f.expand.clone()).unwrap_or_default();

        ExpandSettings {
            source: pick(&self.source, section.source, DEFAULT_SOURCE),
            dest: pick(&self.dest, section.dest, DEFAULT_DEST),
            ports: pick(&self.ports, section.ports, DEFAULT_PORTS),
            output: pick(&self.output, section.output, DEFAULT_EXPAND_OUTPUT),
        }
    }
}

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "flatten")]
#[command(about = "Flatten a stanza config into one source,destination,port rule per line")]
pub struct FlattenArgs {
    /// Stanza config to read [default: config]
    #[arg(short = 'i', long = "iconfig")]
    pub input: Option<String>,

    /// Rule list to write [default: <input>_out]
    #[arg(short = 'o', long = "oconfig")]
    pub output: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl FlattenArgs {
    pub fn settings(&self, file: Option<&TomlConfig>) -> FlattenSettings {
        let section = file.and_then(|f| f.flatten.clone()).unwrap_or_default();

        let input = pick(&self.input, section.input, DEFAULT_FLATTEN_INPUT);
        let output = match (&self.output, section.output) {
            (Some(output), _) => output.clone(),
            (None, Some(output)) => output,
            (None, None) => default_flatten_output(&input),
        };

        FlattenSettings { input, output }
    }
}

fn pick(cli: &Option<String>, file: Option<String>, default: &str) -> String {
    cli.clone()
        .or(file)
        .unwrap_or_else(|| default.to_string())
}
