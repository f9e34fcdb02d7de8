pub mod check;
pub mod run;
pub mod script;
pub mod simulate;
pub mod text;
pub mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use slidekit_config::{ConfigLoad, ConfigLoader};
use slidekit_core::{CarouselConfig, SlideDeck, StaticContainer};

/// Options shared by every command that builds a carousel.
#[derive(Debug, Clone, Default, Args)]
pub struct CarouselArgs {
    /// Carousel config file (TOML or JSON). Falls back to
    /// $SLIDEKIT_CONFIG_PATH, $SLIDEKIT_CONFIG_JSON, then slidekit.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Key of a pre-existing slide element; repeat for more slides
    #[arg(long = "slide", value_name = "KEY")]
    pub slides: Vec<String>,
    /// Image URL appended after the slide elements; repeat for more images
    #[arg(long = "image", value_name = "URL")]
    pub images: Vec<String>,
}

/// Everything needed to construct a controller.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub load: ConfigLoad,
    pub container: StaticContainer,
}

impl Prepared {
    pub fn config(&self) -> &CarouselConfig {
        &self.load.config
    }

    pub fn deck(&self) -> Result<SlideDeck> {
        SlideDeck::assemble(Some(&self.container), &self.load.config)
            .context("failed to assemble slide deck")
    }
}

impl CarouselArgs {
    pub fn load(&self) -> Result<ConfigLoad> {
        ConfigLoader::from_process_env()
            .with_optional_path(self.config.clone())
            .load()
            .context("failed to load carousel config")
    }

    /// Load the config, append `--image` URLs and wrap `--slide` keys in a
    /// container matching the configured slide selector.
    pub fn prepare(&self) -> Result<Prepared> {
        let mut load = self.load()?;
        load.config.images.extend(self.images.iter().cloned());
        let container = StaticContainer::with_slides(
            &load.config.slide_selector,
            self.slides.iter().cloned(),
        );
        Ok(Prepared { load, container })
    }
}
