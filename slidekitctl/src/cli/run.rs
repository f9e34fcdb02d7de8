//! Live carousel on the tokio runtime, driven by line-oriented input.

use anyhow::{Context, Result};
use slidekit_core::{CarouselConfig, CarouselRuntime, SlideDeck, SlideRenderer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use super::script::Action;

/// Run until `input` ends or yields `quit`/`destroy`, then shut the carousel
/// down and return the renderer.
pub async fn run_live<R, I>(
    deck: SlideDeck,
    config: CarouselConfig,
    renderer: R,
    input: I,
) -> Result<R>
where
    R: SlideRenderer + Send + 'static,
    I: AsyncBufRead + Unpin,
{
    let (runtime, handle) = CarouselRuntime::new(deck, config, renderer)
        .context("failed to build carousel")?;
    let task = tokio::spawn(runtime.run());

    let mut lines = input.lines();
    while let Some(line) =
        lines.next_line().await.context("failed to read input")?
    {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Action>() {
            Ok(Action::Input(event)) => {
                handle.send(event);
            }
            Ok(Action::Command(command)) => {
                handle.command(command);
            }
            Ok(Action::Destroy | Action::Quit) => break,
            Err(err) => warn!(input = line, "ignoring input: {err:#}"),
        }
    }

    handle.shutdown();
    let renderer = task.await.context("carousel runtime task failed")?;
    info!("carousel stopped");
    Ok(renderer)
}
