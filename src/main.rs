// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use the_appwood::config::{load_and_validate_config, RuntimeBuilder};
use the_appwood::engine::{resolve_waves, TokioScheduler};
use the_appwood::observability::{init_logging, TracingSink};

#[derive(Parser)]
#[command(name = "the-appwood")]
#[command(about = "Start and stop a dependency-ordered set of modules from a config file", long_about = None)]
struct Cli {
    /// YAML or TOML config describing the modules
    config: PathBuf,

    /// Module to start (repeatable); defaults to `lifecycle.required` from the config
    #[arg(short, long = "require", value_name = "NAME")]
    require: Vec<String>,

    /// Print the resolved initialization order and exit
    #[arg(long)]
    order_only: bool,

    /// Print the final app snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_and_validate_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_logging(config.logging.filter.as_deref());

    let required = if cli.require.is_empty() {
        config.lifecycle.required.clone()
    } else {
        cli.require.clone()
    };

    let waves = resolve_waves(&config, &required).context("Failed to resolve modules")?;
    println!("🚀 AppWood");
    println!("═══════════════════════════════════");
    println!("Config: {}", cli.config.display());
    println!("Required: {:?}", required);
    for (level, wave) in waves.iter().enumerate() {
        println!("  Wave {}: {}", level, wave.join(", "));
    }

    if cli.order_only {
        return Ok(());
    }

    let scheduler = TokioScheduler::current()?;
    let app = RuntimeBuilder::from_config(&config, Arc::new(scheduler))?;
    // Replay anything buffered during construction into tracing.
    app.switch_to_sink(Arc::new(TracingSink));

    let started = Instant::now();
    let start_result = app.start(required).await;
    match &start_result {
        Ok(()) => println!("✅ Started {} modules in {:?}", app.running_modules().len(), started.elapsed()),
        Err(e) => eprintln!("❌ Start failed: {}", e),
    }

    let stop_result = if start_result.is_ok() {
        let stopping = Instant::now();
        let result = app.stop().await;
        match &result {
            Ok(()) => println!("✅ Stopped in {:?}", stopping.elapsed()),
            Err(e) => eprintln!("❌ Stop failed: {}", e),
        }
        result
    } else {
        Ok(())
    };

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&app.snapshot())
            .context("Failed to serialize app snapshot")?;
        println!("{}", snapshot);
    }

    start_result.context("Start failed")?;
    stop_result.context("Stop failed")?;
    Ok(())
}
