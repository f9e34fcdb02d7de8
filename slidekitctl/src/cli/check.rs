use anyhow::Result;
use slidekit_core::CarouselConfig;

use super::CarouselArgs;

/// Load the config (plus any CLI slides) and describe the result.
pub fn check(args: &CarouselArgs) -> Result<Vec<String>> {
    let prepared = args.prepare()?;
    let mut report = vec![format!("config: {}", prepared.load.source)];
    report.extend(summarize(prepared.config()));

    if !args.slides.is_empty() || !prepared.config().images.is_empty() {
        let deck = prepared.deck()?;
        report.push(format!("slides: {}", deck.len()));
    }

    if !prepared.load.overrides.is_empty() {
        report.push(format!(
            "env overrides: {}",
            prepared.load.overrides.join(", ")
        ));
    }

    for warning in prepared.load.warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                report.push(format!("warning: {} ({hint})", warning.message))
            }
            None => report.push(format!("warning: {}", warning.message)),
        }
    }
    if prepared.load.warnings.is_empty() {
        report.push("ok".to_string());
    }
    Ok(report)
}

pub fn summarize(config: &CarouselConfig) -> Vec<String> {
    let autoplay = if config.autoplay {
        format!(
            "every {}, quiet period {}",
            humantime::format_duration(config.delay()),
            humantime::format_duration(config.interaction_quiet_period())
        )
    } else {
        "off".to_string()
    };
    let arrows = if config.arrows {
        format!("{}px, margin {}px", config.arrow_size, config.arrow_margin)
    } else {
        "off".to_string()
    };
    let pagination = match (config.pagination, config.pagination_dots) {
        (false, _) => "off".to_string(),
        (true, Some(dots)) => format!("{dots} dots"),
        (true, None) => "one dot per slide".to_string(),
    };

    vec![
        format!("autoplay: {autoplay}"),
        format!(
            "transition: {}",
            humantime::format_duration(config.transition_duration())
        ),
        format!("arrows: {arrows}"),
        format!("pagination: {pagination}"),
        format!(
            "pause on pointer over: {}",
            if config.pause_on_pointer_over { "on" } else { "off" }
        ),
        format!("images: {}", config.images.len()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_defaults() {
        let lines = summarize(&CarouselConfig::default());
        assert_eq!(lines[0], "autoplay: every 3s, quiet period 6s");
        assert_eq!(lines[1], "transition: 1s");
        assert_eq!(lines[2], "arrows: 50px, margin 20px");
        assert_eq!(lines[3], "pagination: 10 dots");
    }

    #[test]
    fn summary_for_manual_carousel() {
        let config = CarouselConfig {
            autoplay: false,
            arrows: false,
            pagination_dots: None,
            ..CarouselConfig::default()
        };
        let lines = summarize(&config);
        assert_eq!(lines[0], "autoplay: off");
        assert_eq!(lines[2], "arrows: off");
        assert_eq!(lines[3], "pagination: one dot per slide");
    }
}
