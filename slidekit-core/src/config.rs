//! Carousel configuration
//!
//! `CarouselConfig` is immutable once a controller is built from it. Every
//! field has a default so partial TOML/JSON documents deserialize cleanly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default constants shared by the config defaults and the loaders.
pub mod defaults {
    /// Autoplay cadence (ms).
    pub const DELAY_MS: u64 = 3_000;
    /// Transition duration handed to renderers (ms).
    pub const TRANSITION_DURATION_MS: u64 = 1_000;
    /// Arrow button edge length (px).
    pub const ARROW_SIZE: u32 = 50;
    /// Arrow distance from the container edge (px).
    pub const ARROW_MARGIN: u32 = 20;
    /// Number of pagination dots visible at once.
    pub const PAGINATION_DOTS: usize = 10;
    /// Selector matching pre-existing slide elements.
    pub const SLIDE_SELECTOR: &str = ".slidekit__item";
    /// Selector for the image inside a slide element.
    pub const IMAGE_SELECTOR: &str = "img";
    /// Multiplier applied to the autoplay delay for the quiet period that
    /// follows a user interaction.
    pub const INTERACTION_QUIET_FACTOR: u32 = 2;
}

/// Static configuration for a carousel instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Start advancing automatically after construction and after every
    /// interaction quiet period.
    pub autoplay: bool,
    /// Autoplay cadence in milliseconds. Must be greater than zero.
    pub delay_ms: u64,
    /// Transition duration passed through to the renderer. The controller
    /// never animates anything itself.
    pub transition_duration_ms: u64,
    /// Whether prev/next arrow controls are wired.
    pub arrows: bool,
    pub arrow_size: u32,
    pub arrow_margin: u32,
    /// Whether the pagination dot strip is wired.
    pub pagination: bool,
    /// How many dots are visible at once. `None` shows one dot per slide;
    /// documents spell it `"all"` (or `null` in JSON).
    #[serde(
        serialize_with = "serialize_dot_count",
        deserialize_with = "deserialize_dot_count"
    )]
    pub pagination_dots: Option<usize>,
    /// Pause autoplay while the pointer is over the carousel.
    #[serde(alias = "user_interaction_over")]
    pub pause_on_pointer_over: bool,
    pub slide_selector: String,
    pub image_selector: String,
    /// Image URLs to synthesize slides from, appended after any existing
    /// slide elements.
    pub images: Vec<String>,
}

/// Keyword selecting one pagination dot per slide.
pub const ALL_DOTS: &str = "all";

#[derive(Deserialize)]
#[serde(untagged)]
enum DotCount {
    Count(usize),
    Keyword(String),
}

fn deserialize_dot_count<'de, D>(
    deserializer: D,
) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<DotCount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DotCount::Count(count)) => Ok(Some(count)),
        Some(DotCount::Keyword(word))
            if word.trim().eq_ignore_ascii_case(ALL_DOTS) =>
        {
            Ok(None)
        }
        Some(DotCount::Keyword(word)) => Err(serde::de::Error::custom(
            format!("expected a dot count or \"{ALL_DOTS}\", found \"{word}\""),
        )),
    }
}

fn serialize_dot_count<S>(
    dots: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match dots {
        Some(count) => serializer.serialize_u64(*count as u64),
        None => serializer.serialize_str(ALL_DOTS),
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            delay_ms: defaults::DELAY_MS,
            transition_duration_ms: defaults::TRANSITION_DURATION_MS,
            arrows: true,
            arrow_size: defaults::ARROW_SIZE,
            arrow_margin: defaults::ARROW_MARGIN,
            pagination: true,
            pagination_dots: Some(defaults::PAGINATION_DOTS),
            pause_on_pointer_over: true,
            slide_selector: defaults::SLIDE_SELECTOR.to_string(),
            image_selector: defaults::IMAGE_SELECTOR.to_string(),
            images: Vec::new(),
        }
    }
}

impl CarouselConfig {
    /// Reject values the scheduler or the pagination window cannot work
    /// with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.pagination_dots == Some(0) {
            return Err(ConfigError::ZeroPaginationDots);
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Quiet period after a user interaction before autoplay may resume.
    pub fn interaction_quiet_period(&self) -> Duration {
        self.delay() * defaults::INTERACTION_QUIET_FACTOR
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Effective pagination window size for a deck of `total` slides.
    /// Returns `None` when pagination is disabled.
    pub fn pagination_window(&self, total: usize) -> Option<usize> {
        if !self.pagination {
            return None;
        }
        Some(self.pagination_dots.unwrap_or(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CarouselConfig::default();
        assert!(config.autoplay);
        assert_eq!(config.delay(), Duration::from_secs(3));
        assert_eq!(config.interaction_quiet_period(), Duration::from_secs(6));
        assert_eq!(config.pagination_dots, Some(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        let config = CarouselConfig {
            delay_ms: 0,
            ..CarouselConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDelay));

        let config = CarouselConfig {
            pagination_dots: Some(0),
            ..CarouselConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPaginationDots));
    }

    #[test]
    fn partial_json_keeps_defaults_and_accepts_legacy_alias() {
        let config: CarouselConfig = serde_json::from_str(
            r#"{"delay_ms": 1200, "user_interaction_over": false}"#,
        )
        .expect("parse config");
        assert_eq!(config.delay_ms, 1200);
        assert!(!config.pause_on_pointer_over);
        assert!(config.arrows);
        assert_eq!(config.slide_selector, defaults::SLIDE_SELECTOR);
    }

    #[test]
    fn pagination_dots_accept_the_all_keyword() {
        let config: CarouselConfig =
            serde_json::from_str(r#"{"pagination_dots": "ALL"}"#)
                .expect("parse config");
        assert_eq!(config.pagination_dots, None);

        let config: CarouselConfig =
            serde_json::from_str(r#"{"pagination_dots": 4}"#)
                .expect("parse config");
        assert_eq!(config.pagination_dots, Some(4));

        let err = serde_json::from_str::<CarouselConfig>(
            r#"{"pagination_dots": "most"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("dot count"), "{err}");
    }

    #[test]
    fn unlimited_dots_serialize_as_keyword() {
        let config = CarouselConfig {
            pagination_dots: None,
            ..CarouselConfig::default()
        };
        let json = serde_json::to_value(&config).expect("serialize");
        assert_eq!(json["pagination_dots"], serde_json::json!("all"));
    }

    #[test]
    fn pagination_window_falls_back_to_deck_size() {
        let mut config = CarouselConfig {
            pagination_dots: None,
            ..CarouselConfig::default()
        };
        assert_eq!(config.pagination_window(7), Some(7));
        config.pagination = false;
        assert_eq!(config.pagination_window(7), None);
    }
}
