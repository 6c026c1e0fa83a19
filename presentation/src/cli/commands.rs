//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for alignment results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report with scores and diagnostics
    Full,
    /// JSON outcome (tagged by "status")
    Json,
}

/// CLI arguments for tool-align
#[derive(Parser, Debug)]
#[command(name = "tool-align")]
#[command(author, version, about = "Align model-emitted tool calls against a tool registry")]
#[command(long_about = r#"
tool-align repairs a tool call emitted by a language model before it is executed.

The call goes through two stages:
1. Tool name: the invoked name is matched against the registry
2. Arguments: each key is matched to a parameter and values are coerced

Misspellings are caught by edit distance, paraphrases by embedding similarity.
Calls that cannot be repaired unambiguously are rejected with a reason code.

Configuration files are loaded from (in priority order):
1. TOOL_ALIGN_* environment variables
2. --config <path>          Explicit config file
3. ./tool-align.toml        Project-level config
4. ~/.config/tool-align/config.toml   Global config

Example:
  tool-align --registry tools.toml --call '{"name": "creat_script", "arguments": {"pathh": "a.py"}}'
  echo '{"name": "bash", "arguments": {"cmd": "ls"}}' | tool-align --registry tools.json -o json
"#)]
pub struct Cli {
    /// Tool registry file (.toml or .json); overrides [registry].path
    #[arg(short, long, value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Raw tool call as JSON
    #[arg(long, value_name = "JSON", conflicts_with = "call_file")]
    pub call: Option<String>,

    /// Read the raw tool call from a file (stdin when neither is given)
    #[arg(long, value_name = "PATH")]
    pub call_file: Option<PathBuf>,

    /// Score names lexically only, without embeddings
    #[arg(long)]
    pub lexical_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "tool-align",
            "--registry",
            "tools.toml",
            "--call",
            r#"{"name": "x"}"#,
            "--lexical-only",
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.registry, Some(PathBuf::from("tools.toml")));
        assert_eq!(cli.call.as_deref(), Some(r#"{"name": "x"}"#));
        assert!(cli.lexical_only);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_call_and_call_file_conflict() {
        let result = Cli::try_parse_from([
            "tool-align",
            "--call",
            "{}",
            "--call-file",
            "call.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tool-align"]);
        assert_eq!(cli.output, OutputFormat::Full);
        assert!(!cli.no_config);
        assert!(cli.registry.is_none());
    }
}
