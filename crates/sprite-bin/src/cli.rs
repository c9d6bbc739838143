use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sprite_batch::{ExtractConfig, ParseErrorPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "sprite-extract",
    version,
    about = "Extract the trimmed first frame of each sprite's idle animation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file (defaults are used when it does not exist)
    #[arg(long, global = true, env = "SPRITE_EXTRACT_CONFIG", default_value = "sprite-extract.json")]
    pub config: PathBuf,

    /// Base URL of the remote sprite store
    #[arg(long, global = true, env = "SPRITE_EXTRACT_BASE_URL")]
    pub base_url: Option<String>,

    /// What to do with a malformed AnimData.xml in batch modes
    #[arg(long, global = true, value_enum)]
    pub on_parse_error: Option<ParseErrorArg>,

    /// Write a JSON report of every processed item to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Process one remote sprite, prompting for its path if omitted
    Debug {
        /// Sprite path, e.g. sprite/0006/0000/0001/
        sprite_path: Option<String>,

        #[arg(long, default_value = "debug_output")]
        output: PathBuf,
    },
    /// Process every sprite directory under a local folder
    Local {
        #[arg(long, default_value = "1004")]
        input: PathBuf,

        #[arg(long, default_value = "output_sprites")]
        output: PathBuf,
    },
    /// Process sprite paths listed in a text file, fetching from the remote store
    Remote {
        #[arg(long, default_value = "sprite_list.txt")]
        list: PathBuf,

        #[arg(long, default_value = "output_sprites")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorArg {
    Abort,
    Skip,
}

impl From<ParseErrorArg> for ParseErrorPolicy {
    fn from(arg: ParseErrorArg) -> Self {
        match arg {
            ParseErrorArg::Abort => ParseErrorPolicy::Abort,
            ParseErrorArg::Skip => ParseErrorPolicy::Skip,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, mut config: ExtractConfig) -> ExtractConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(policy) = self.on_parse_error {
            config.on_parse_error = policy.into();
        }
        config
    }
}
