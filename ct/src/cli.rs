//! CLI argument parsing for casetrail

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ct")]
#[command(author, version, about = "Audit-training curriculum tracker", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Case snapshot (JSON array), overrides the configured path
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// Catalog snapshot (JSON array), overrides the configured path
    #[arg(long)]
    pub recipes: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the recommended next action for the trainee
    Next {
        /// Scope to one module (any alias form)
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Show tier progress and the module-by-module journey
    Journey,

    /// List selectable modules, most recently active first
    Modules,

    /// Dump the full progression view
    View {
        /// Scope to one module (any alias form)
        #[arg(short, long)]
        module: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for the view command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_next() {
        let cli = Cli::parse_from(["ct", "next"]);
        assert!(matches!(cli.command, Command::Next { module: None }));
    }

    #[test]
    fn test_cli_parse_next_with_module() {
        let cli = Cli::parse_from(["ct", "next", "--module", "payables"]);
        match cli.command {
            Command::Next { module } => assert_eq!(module.as_deref(), Some("payables")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_view_json() {
        let cli = Cli::parse_from(["ct", "view", "--format", "json"]);
        match cli.command {
            Command::View { format, .. } => assert!(matches!(format, OutputFormat::Json)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_snapshot_overrides() {
        let cli = Cli::parse_from(["ct", "--cases", "/tmp/cases.json", "journey"]);
        assert_eq!(cli.cases.as_deref(), Some(std::path::Path::new("/tmp/cases.json")));
    }

    #[test]
    fn test_output_format_parse() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
