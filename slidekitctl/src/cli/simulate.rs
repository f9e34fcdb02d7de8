//! Deterministic virtual-time runs.

use std::time::Duration;

use anyhow::{Context, Result};
use slidekit_core::{
    CarouselConfig, CarouselController, SlideContainer, VirtualTimers,
};

use super::script::{Action, ScriptedEvent};
use super::text::TextRenderer;

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Virtual time to run for. Nothing due after this is processed.
    pub run_for: Duration,
    pub events: Vec<ScriptedEvent>,
}

/// Build a carousel on a virtual clock, replay `options.events` and return
/// one line per renderer call and applied event.
///
/// Timers due at the same instant as a scripted event fire first.
pub fn simulate<C>(
    container: &C,
    config: CarouselConfig,
    options: SimulateOptions,
) -> Result<Vec<String>>
where
    C: SlideContainer + ?Sized,
{
    let mut controller = CarouselController::new(
        Some(container),
        config,
        TextRenderer::new(),
        VirtualTimers::new(),
    )
    .context("failed to build carousel")?;

    let mut events = options.events;
    events.sort_by_key(|event| event.at);
    let mut queue = events.into_iter().peekable();

    while !controller.is_destroyed() {
        let next_timer = controller.timers().next_due().map(|(at, _)| at);
        let next_event = queue.peek().map(|event| event.at);
        let Some(at) = [next_timer, next_event].into_iter().flatten().min()
        else {
            break;
        };
        if at > options.run_for {
            break;
        }

        controller.renderer_mut().set_now(at);
        controller.advance_clock_to(at);

        while let Some(event) = queue.next_if(|event| event.at <= at) {
            controller
                .renderer_mut()
                .note(format!("event {}", event.action));
            match event.action {
                Action::Input(input) => controller.handle_input(input),
                Action::Command(command) => controller.apply(command),
                Action::Destroy | Action::Quit => controller.destroy(),
            }
        }
    }

    Ok(controller.into_renderer().into_lines())
}

#[cfg(test)]
mod tests {
    use slidekit_core::{InputEvent, StaticContainer};

    use super::*;

    fn container(n: usize) -> StaticContainer {
        StaticContainer::with_slides(
            slidekit_core::config::defaults::SLIDE_SELECTOR,
            (0..n).map(|i| format!("s{i}")),
        )
    }

    fn config(delay_ms: u64) -> CarouselConfig {
        CarouselConfig {
            delay_ms,
            transition_duration_ms: 100,
            pagination_dots: Some(2),
            ..CarouselConfig::default()
        }
    }

    #[test]
    fn autoplay_ticks_are_stamped() {
        let lines = simulate(
            &container(3),
            config(1000),
            SimulateOptions {
                run_for: Duration::from_millis(2500),
                events: Vec::new(),
            },
        )
        .expect("simulate");

        assert_eq!(
            lines,
            [
                "t=0ms mount slides=3 transition=100ms arrows=50px+20px dots=2",
                "t=0ms active=0 slides=[*..] dots=[(0) 1]",
                "t=1000ms active=1 slides=[.*.] dots=[0 (1)]",
                "t=2000ms active=2 slides=[..*] dots=[1 (2)]",
            ]
        );
    }

    #[test]
    fn events_apply_after_due_timers_and_destroy_ends_the_run() {
        let events = vec![
            ScriptedEvent {
                at: Duration::from_millis(1000),
                action: Action::Input(InputEvent::PrevClicked),
            },
            ScriptedEvent {
                at: Duration::from_millis(1500),
                action: Action::Destroy,
            },
        ];
        let lines = simulate(
            &container(3),
            config(1000),
            SimulateOptions {
                run_for: Duration::from_secs(60),
                events,
            },
        )
        .expect("simulate");

        assert_eq!(
            &lines[2..],
            [
                "t=1000ms active=1 slides=[.*.] dots=[0 (1)]",
                "t=1000ms event prev",
                "t=1000ms active=0 slides=[*..] dots=[(0) 1]",
                "t=1500ms event destroy",
                "t=1500ms unmount",
            ]
        );
    }

    #[test]
    fn empty_container_is_an_error() {
        let err = simulate(
            &StaticContainer::new(),
            config(1000),
            SimulateOptions::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no slides"), "{err:#}");
    }
}
