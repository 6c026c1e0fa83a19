//! CLI entrypoint for tool-align
//!
//! This is the main binary that wires together all layers using
//! dependency injection.
//!
//! Exit codes: 0 when the call aligned, 2 when it was rejected, 1 on faults
//! (bad config, unreadable registry, malformed call JSON, embedder failure).

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::Read;
use std::sync::Arc;
use toolalign_application::{AlignToolCallUseCase, BuildRegistryUseCase};
use toolalign_domain::{AlignmentOutcome, RawToolCall};
use toolalign_infrastructure::{ConfigLoader, RegistryFileLoader, embedder_from_config};
use toolalign_presentation::{Cli, ConsoleFormatter, OutputFormat};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXIT_REJECTED: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;

    let mut alignment = config.to_alignment_config();
    if cli.lexical_only {
        alignment = alignment.lexical_only();
    }

    let registry_path = match cli.registry.clone().or_else(|| config.registry.path.clone()) {
        Some(path) => path,
        None => bail!("A tool registry is required. Use --registry <PATH> or set [registry].path."),
    };

    // === Dependency Injection ===
    let embedder = if alignment.semantic_enabled {
        embedder_from_config(&config.embedding)?
    } else {
        None
    };

    let schemas = RegistryFileLoader::load(&registry_path)
        .with_context(|| format!("Failed to load registry {}", registry_path.display()))?;

    let registry = match &embedder {
        Some(embedder) => BuildRegistryUseCase::with_embedder(Arc::clone(embedder)),
        None => BuildRegistryUseCase::new(),
    }
    .execute(schemas)
    .await?;
    let registry = Arc::new(registry);

    let use_case = match embedder {
        Some(embedder) => AlignToolCallUseCase::with_embedder(registry, alignment, embedder)?,
        None => AlignToolCallUseCase::new(registry, alignment)?,
    };
    info!(
        "Ready (semantic scoring {})",
        if use_case.semantic_enabled() { "on" } else { "off" }
    );

    // === Align ===
    let call = read_call(&cli)?;
    debug!("Raw call: {:?}", call);

    let outcome = use_case.execute(&call).await?;

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    println!("{}", output);

    if let AlignmentOutcome::Rejected(_) = outcome {
        std::process::exit(EXIT_REJECTED);
    }

    Ok(())
}

/// Read the raw call from `--call`, `--call-file`, or stdin
fn read_call(cli: &Cli) -> Result<RawToolCall> {
    let json = if let Some(json) = &cli.call {
        json.clone()
    } else if let Some(path) = &cli.call_file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read call file {}", path.display()))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read call from stdin")?;
        buf
    };

    if json.trim().is_empty() {
        bail!("No tool call given. Use --call <JSON>, --call-file <PATH>, or pipe JSON on stdin.");
    }

    serde_json::from_str(&json).context("Tool call is not valid JSON")
}
