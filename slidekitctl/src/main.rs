use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slidekitctl::cli::{
    CarouselArgs, check,
    run::run_live,
    script::{ScriptedEvent, load_script},
    simulate::{SimulateOptions, simulate},
    text::LogRenderer,
    tui,
};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "slidekitctl", about = "Drive and inspect slidekit carousels")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the carousel config and report guard-rail warnings
    Check {
        #[command(flatten)]
        carousel: CarouselArgs,
    },
    /// Run a carousel on a virtual clock and print every frame
    Simulate {
        #[command(flatten)]
        carousel: CarouselArgs,
        /// Virtual time to simulate
        #[arg(long = "for", value_name = "DURATION", default_value = "10s", value_parser = humantime::parse_duration)]
        run_for: Duration,
        /// Timed action, e.g. `1500ms:dot 2`; repeat for more
        #[arg(long = "event", value_name = "AT:ACTION")]
        events: Vec<ScriptedEvent>,
        /// File of `<offset> <action>` lines
        #[arg(long, value_name = "PATH")]
        script: Option<PathBuf>,
    },
    /// Run a carousel on real timers, reading actions from stdin
    Run {
        #[command(flatten)]
        carousel: CarouselArgs,
    },
    /// Interactive terminal carousel
    Play {
        #[command(flatten)]
        carousel: CarouselArgs,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal UI owns the screen; only log there when asked to.
    let default_filter = match cli.command {
        Command::Play { .. } => "off",
        Command::Check { .. } | Command::Simulate { .. } => "warn",
        Command::Run { .. } => "info",
    };
    init_tracing(default_filter);

    match cli.command {
        Command::Check { carousel } => {
            for line in check::check(&carousel)? {
                println!("{line}");
            }
        }
        Command::Simulate {
            carousel,
            run_for,
            mut events,
            script,
        } => {
            if let Some(path) = script {
                events.extend(load_script(&path)?);
            }
            let prepared = carousel.prepare()?;
            let lines = simulate(
                &prepared.container,
                prepared.load.config,
                SimulateOptions { run_for, events },
            )?;
            for line in lines {
                println!("{line}");
            }
        }
        Command::Run { carousel } => {
            let prepared = carousel.prepare()?;
            let deck = prepared.deck()?;
            let stdin = BufReader::new(tokio::io::stdin());
            run_live(deck, prepared.load.config, LogRenderer, stdin)
                .await
                .context("live carousel failed")?;
        }
        Command::Play { carousel } => {
            let prepared = carousel.prepare()?;
            let outcome = tui::play(&prepared)?;
            if let Some(screen) = &outcome.screen {
                for line in screen {
                    println!("{line}");
                }
            }
            println!(
                "stopped at slide {} of {} ({}) after {} transitions",
                outcome.index + 1,
                outcome.total,
                outcome.label,
                outcome.transitions
            );
        }
    }

    Ok(())
}
