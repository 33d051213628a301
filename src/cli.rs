use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::Config;
use crate::tag_input::{TagEvent, TagInput, TagInputOptions, tokenizer};

#[derive(Parser)]
#[command(name = "tagfield")]
#[command(about = "Type free text, get tags - an interactive terminal tag input")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (separate config and log directories)
    #[arg(long)]
    pub dev: bool,

    /// Log level used when TAGFIELD_LOG is not set (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Edit tags interactively (default if no subcommand)
    Edit {
        /// Comma-separated initial tags
        #[arg(long)]
        tags: Option<String>,
        #[command(flatten)]
        overrides: OptionOverrides,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Turn TEXT into tags without opening the terminal UI
    Parse {
        /// Text to split into tags
        text: String,
        #[command(flatten)]
        overrides: OptionOverrides,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Flags that override the `[tag_input]` config section
#[derive(Args, Debug, Default, Clone)]
pub struct OptionOverrides {
    /// Show tags without allowing changes
    #[arg(long)]
    pub read_only: bool,
    /// Keep spaces inside tags instead of splitting on them
    #[arg(long)]
    pub allow_spaces: bool,
    /// Reject tags that already exist
    #[arg(long)]
    pub no_duplicates: bool,
    /// Maximum number of tags
    #[arg(long)]
    pub max_tags: Option<usize>,
}

impl OptionOverrides {
    pub fn apply(&self, options: &mut TagInputOptions) {
        if self.read_only {
            options.read_only = true;
        }
        if self.allow_spaces {
            options.allow_spaces_in_tags = true;
        }
        if self.no_duplicates {
            options.allow_duplicates = false;
        }
        if let Some(max) = self.max_tags {
            options.max_tags = Some(max);
        }
    }
}

#[derive(Args, Debug, Default, Clone, Copy)]
pub struct OutputArgs {
    /// Print tags as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to serialize tags: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Initial tags from a comma-separated `--tags` value
pub fn parse_initial_tags(tags: Option<&str>) -> Vec<String> {
    match tags {
        Some(tags_str) => tokenizer::parse_tags(tags_str, &[',']),
        None => Vec::new(),
    }
}

/// Render tags for stdout: one per line, or a JSON array
pub fn format_output(tags: &[String], output: OutputArgs) -> Result<String, CliError> {
    if output.json {
        Ok(serde_json::to_string(tags)?)
    } else {
        Ok(tags.join("\n"))
    }
}

/// Handle the parse command: type the text into a widget and blur it
pub fn handle_parse(
    text: &str,
    overrides: &OptionOverrides,
    output: OutputArgs,
    config: &Config,
) -> Result<String, CliError> {
    let mut options = config.tag_input.clone();
    overrides.apply(&mut options);
    // Parsing always writes; read-only only matters interactively
    options.read_only = false;

    let mut input = TagInput::new(options);
    let mut events = input.type_str(text);
    events.extend(input.blur());

    for event in &events {
        if let TagEvent::Rejected { tag, reason } = event {
            tracing::warn!(tag = %tag, ?reason, "tag rejected while parsing");
        }
    }

    format_output(input.tags(), output)
}
