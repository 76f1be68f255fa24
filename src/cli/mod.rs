//! CLI argument parsing and command routing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    client::DEFAULT_GATEWAY_URL,
    error::Result,
    prompts::{DEFAULT_ASPECT, DEFAULT_COMPONENTS, DEFAULT_DEFINITION, DEFAULT_QUESTIONS},
};

/// modelgate: one request shape for several hosted LLM providers
#[derive(Debug, Parser)]
#[command(name = "modelgate")]
#[command(about = "LLM provider gateway and evaluation prompt client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway (default)
    Serve {
        /// Address to bind, overriding the config file
        #[arg(long, env = "MODELGATE_BIND")]
        bind: Option<String>,

        /// Config file to load instead of the usual locations
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List providers registered in the gateway
    Providers {
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// List allowed models
    Models {
        /// Only this provider
        provider: Option<String>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Send one message
    Chat {
        #[command(flatten)]
        target: TargetArgs,

        /// Message text, or @FILE
        message: String,
    },

    /// Generate yes/no checklist questions for an evaluation aspect
    Checklist {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        aspect: AspectArgs,

        /// Key components, one per line, or @FILE
        #[arg(long, default_value = DEFAULT_COMPONENTS, hide_default_value = true)]
        components: String,

        /// Print the prompt instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Answer checklist questions about a data report
    Evaluate {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        aspect: AspectArgs,

        /// Source data the report was written from, or @FILE
        #[arg(long)]
        source: String,

        /// Report under evaluation, or @FILE
        #[arg(long)]
        report: String,

        /// Questions, one per line, or @FILE
        #[arg(long, default_value = DEFAULT_QUESTIONS, hide_default_value = true)]
        questions: String,

        /// Print the prompt instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

/// Where the gateway lives
#[derive(Debug, Clone, Args)]
pub struct GatewayArgs {
    /// Gateway base URL
    #[arg(long, env = "MODELGATE_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub url: String,
}

/// Provider and model to send to
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Provider name
    #[arg(short, long, default_value = "openai")]
    pub provider: String,

    /// Model name; the provider default when omitted
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print only the reply, without the provider/model label
    #[arg(long)]
    pub raw: bool,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}

/// Aspect under evaluation
#[derive(Debug, Clone, Args)]
pub struct AspectArgs {
    /// Evaluation aspect
    #[arg(long, default_value = DEFAULT_ASPECT)]
    pub aspect: String,

    /// Definition of the aspect, or @FILE
    #[arg(long, default_value = DEFAULT_DEFINITION, hide_default_value = true)]
    pub definition: String,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Resolve a text argument; `@path` reads the file at `path`
///
/// # Errors
///
/// Returns an error if the referenced file cannot be read
pub fn read_text_arg(value: &str) -> Result<String> {
    match value.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(value.to_string()),
    }
}
