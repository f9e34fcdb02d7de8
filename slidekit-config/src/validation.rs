use slidekit_core::{CarouselConfig, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(transparent)]
    Invalid(#[from] ConfigError),
    #[error("arrow_size must be greater than zero when arrows are enabled")]
    ZeroArrowSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &CarouselConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    config.validate()?;

    if config.arrows && config.arrow_size == 0 {
        return Err(ConfigGuardRailError::ZeroArrowSize);
    }

    let mut warnings = ConfigWarnings::default();

    if config.autoplay && config.delay_ms < config.transition_duration_ms {
        warnings.push_with_hint(
            format!(
                "autoplay delay ({} ms) is shorter than the transition ({} ms); slides will change mid-transition",
                config.delay_ms, config.transition_duration_ms
            ),
            "Raise delay_ms or lower transition_duration_ms",
        );
    }

    if !config.pagination && config.pagination_dots.is_some() {
        warnings.push(
            "pagination_dots has no effect while pagination is disabled",
        );
    }

    if !config.autoplay && !config.arrows && !config.pagination {
        warnings.push_with_hint(
            "carousel has no autoplay, arrows or pagination; slides can only change programmatically",
            "Enable at least one of autoplay, arrows or pagination",
        );
    }

    if !config.autoplay && config.pause_on_pointer_over {
        warnings.push_with_hint(
            "autoplay is disabled but pause_on_pointer_over is on; moving the pointer out of the carousel starts autoplay",
            "Set pause_on_pointer_over = false for a fully manual carousel",
        );
    }

    for (index, image) in config.images.iter().enumerate() {
        if image.trim().is_empty() {
            warnings.push_with_hint(
                format!("images[{index}] is blank"),
                "Remove empty entries from the images list",
            );
        }
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_without_warnings() {
        let warnings =
            apply_guard_rails(&CarouselConfig::default()).expect("valid");
        assert!(warnings.is_empty(), "{:?}", warnings.items);
    }

    #[test]
    fn core_validation_errors_surface() {
        let config = CarouselConfig {
            delay_ms: 0,
            ..CarouselConfig::default()
        };
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::Invalid(ConfigError::ZeroDelay))
        ));
    }

    #[test]
    fn zero_arrow_size_only_matters_with_arrows() {
        let mut config = CarouselConfig {
            arrow_size: 0,
            ..CarouselConfig::default()
        };
        assert!(matches!(
            apply_guard_rails(&config),
            Err(ConfigGuardRailError::ZeroArrowSize)
        ));
        config.arrows = false;
        assert!(apply_guard_rails(&config).is_ok());
    }

    #[test]
    fn manual_carousel_with_hover_resume_is_flagged() {
        let config = CarouselConfig {
            autoplay: false,
            ..CarouselConfig::default()
        };
        let warnings = apply_guard_rails(&config).expect("valid");
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains("pause_on_pointer_over"));
    }

    #[test]
    fn blank_images_and_fast_delay_warn() {
        let config = CarouselConfig {
            delay_ms: 500,
            images: vec!["a.jpg".into(), "  ".into()],
            ..CarouselConfig::default()
        };
        let warnings = apply_guard_rails(&config).expect("valid");
        let messages: Vec<_> =
            warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("shorter than the transition"));
        assert_eq!(messages[1], "images[1] is blank");
    }
}
