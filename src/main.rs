use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rust_sweeper::catalog::{Category, CATALOG};
use rust_sweeper::cli::{Args, Commands};
use rust_sweeper::models::InputArtifact;
use rust_sweeper::mount::DirectMaterializer;
use rust_sweeper::runner::{run_single_query, run_sweep, QueryRequest, SweepRequest};
use rust_sweeper::storage::LocalOutputStore;
use rust_sweeper::toolkit::global_registry;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Catalog inspection needs no inputs or toolkit
    if let Some(Commands::ListPresets) = &args.command {
        return list_presets();
    }

    info!("starting artifact sweep");

    let inputs: Vec<InputArtifact> = args.inputs.iter().map(InputArtifact::from_path).collect();
    let store = LocalOutputStore::new(&args.output);
    let materializer = DirectMaterializer;

    let report = match &args.command {
        Some(Commands::Query { tool, args: extra }) => {
            let request = QueryRequest {
                inputs,
                script: tool.clone(),
                arguments: extra.clone(),
            };
            run_single_query(global_registry(), &store, &materializer, &request)?
        }
        _ => {
            let request = build_sweep_request(&args, inputs)?;
            run_sweep(global_registry(), &store, &materializer, &request)?
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize run report")?
    );
    info!("sweep finished with {} artifact(s)", report.artifacts.len());
    Ok(())
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Assemble the sweep request from a YAML request file or the CLI flags
fn build_sweep_request(args: &Args, inputs: Vec<InputArtifact>) -> Result<SweepRequest> {
    if let Some(path) = &args.request {
        let content = fs::read_to_string(path)
            .context(format!("failed to read request file: {}", path.display()))?;
        let mut request: SweepRequest =
            serde_yaml::from_str(&content).context("failed to parse request file")?;
        if request.inputs.is_empty() {
            request.inputs = inputs;
        }
        return Ok(request);
    }

    let rule_text = match (&args.rule, &args.rule_file) {
        (Some(inline), _) => Some(inline.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .context(format!("failed to read rule file: {}", path.display()))?,
        ),
        (None, None) => None,
    };

    Ok(SweepRequest {
        inputs,
        scopes: if args.scopes.is_empty() {
            None
        } else {
            Some(args.scopes.clone().into())
        },
        rule_text,
        rule_paths: if args.rule_paths.is_empty() {
            None
        } else {
            Some(args.rule_paths.clone().into())
        },
        export_uri: args.export_uri.clone(),
        case_id: args.case_id.clone(),
        export_enabled: args.export_enabled(),
    })
}

/// Print the preset catalog with categories and extraction functions
fn list_presets() -> Result<()> {
    println!("Categories:");
    for category in Category::ALL {
        println!("  {:<32} {}", category.id(), category.label());
    }

    println!();
    println!("{:<42} {:<20} categories", "preset", "function");
    for preset in CATALOG.iter() {
        let categories = preset
            .categories
            .iter()
            .map(|c| c.id())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<42} {:<20} {}",
            preset.name,
            preset.plugin().unwrap_or("-"),
            categories
        );
    }
    Ok(())
}
