//! Headless tile-runner client.
//!
//! Reads settings from the environment (and `.env`), boots the runtime from
//! the data directory, then plays a command script given either as arguments
//! or on stdin.
//!
//! ```bash
//! RUNNER_SEED=7 cargo run -p runner-client -- roll right right show
//! echo "roll up-right look:3,4" | cargo run -p runner-client
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::GameConfig;
use runner_client::{ClientConfig, Driver, StepReport, parse_script};
use runtime::{Event, LevelEvent, Runtime, Topic};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = ClientConfig::from_env();
    tracing::info!("Starting runner client");
    tracing::info!("Data directory: {}", config.data_dir.display());

    let script = read_script()?;
    let steps = parse_script(&script)?;

    let factory = ContentFactory::new(&config.data_dir);
    let game_config = match factory.load_config() {
        Ok(game_config) => game_config,
        Err(e) => {
            tracing::warn!("Using default game config: {:#}", e);
            GameConfig::default()
        }
    };

    let runtime = Runtime::builder()
        .config(config.runtime_config(game_config))
        .build()
        .await?;
    tracing::info!("Runtime ready (seed {})", runtime.seed());

    let handle = runtime.handle();
    let mut level_rx = handle.subscribe(Topic::Level);
    let level_log = tokio::spawn(async move {
        while let Ok(Event::Level(event)) = level_rx.recv().await {
            match event {
                LevelEvent::Loaded { key, level } => println!("== level {level}: {key} =="),
                LevelEvent::Halted { message } => println!("!! {message}"),
                LevelEvent::GameOver { reason } => {
                    println!("!! {}", reason.as_deref().unwrap_or("Game over"))
                }
                LevelEvent::Transition(_) => {}
            }
        }
    });

    let driver = Driver::new(handle, runtime.tiles().clone());
    let reports = driver.play(&steps).await?;
    for report in reports {
        print_report(&report);
    }

    drop(driver);
    runtime.shutdown().await?;
    level_log.await.context("Level log task failed")?;

    tracing::info!("Client shutdown complete");
    Ok(())
}

fn setup_logging() {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_script() -> Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }
    let mut script = String::new();
    std::io::stdin()
        .read_to_string(&mut script)
        .context("Failed to read script from stdin")?;
    Ok(script)
}

fn print_report(report: &StepReport) {
    match report {
        StepReport::Messages(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        StepReport::Rejected(reason) => println!("rejected: {reason}"),
        StepReport::Snapshot { map, status } => {
            print!("{map}");
            println!("{status}");
        }
        StepReport::Hint(Some(hint)) => println!("hint: {hint}"),
        StepReport::Hint(None) => println!("hint: nothing here"),
        StepReport::Halted(message) => println!("halted: {message}"),
    }
}
