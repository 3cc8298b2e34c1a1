mod audio;
mod cli;
mod config;
mod error;
mod pattern;

use anyhow::{Context, Result};
use clap::Parser;

use audio::analysis::{analyze_file, AnalysisConfig, MAX_DURATION};
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Config values apply only when the CLI is at its default
    let config_path = cli.config.clone().or_else(config::discover_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            if cli.max_duration == MAX_DURATION {
                cli.max_duration = cfg.analysis.max_duration;
            }
            if !cli.json {
                cli.json = cfg.output.json;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    cli.validate()?;

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    log::info!("loopscribe - drum loop transcription");
    log::info!("Input: {}", cli.input.display());

    let analysis_config = AnalysisConfig {
        max_duration: cli.max_duration,
    };
    let analysis = analyze_file(&cli.input, cli.format.as_deref(), &analysis_config)?;

    let pattern = &analysis.pattern;
    log::info!(
        "{} BPM (estimated {:.1}), {} beats ({} bars, {} steps), {}s",
        pattern.bpm,
        analysis.tempo,
        pattern.beats,
        pattern.bars,
        analysis.grid.step_count,
        pattern.duration
    );

    if let Some(ref path) = cli.stats {
        let json = serde_json::to_string_pretty(pattern)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write statistics: {}", path.display()))?;
        log::info!("Statistics written to {}", path.display());
    }

    let rendered = if cli.json {
        serde_json::to_string_pretty(&serde_json::json!({
            "pattern": pattern,
            "code": analysis.code,
        }))?
    } else {
        analysis.code.clone()
    };

    match cli.output {
        Some(ref path) => {
            std::fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            log::info!("Done! Output: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
