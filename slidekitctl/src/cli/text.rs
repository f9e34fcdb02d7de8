//! Plain-text frame rendering shared by `simulate` and `run`.

use std::time::Duration;

use slidekit_core::{Frame, MountPlan, SlideRenderer};
use tracing::info;

/// `active=1 slides=[.*.] dots=[0 (1) 2]`
pub fn describe_frame(frame: &Frame) -> String {
    let slides: String = frame
        .slides
        .iter()
        .map(|slide| if slide.active { '*' } else { '.' })
        .collect();
    let dots = if frame.dots.is_empty() {
        "-".to_string()
    } else {
        let labels: Vec<String> = frame
            .dots
            .iter()
            .map(|dot| {
                if dot.active {
                    format!("({})", dot.slide)
                } else {
                    dot.slide.to_string()
                }
            })
            .collect();
        format!("[{}]", labels.join(" "))
    };
    format!("active={} slides=[{slides}] dots={dots}", frame.active)
}

/// `mount slides=3 transition=1s arrows=50px+20px dots=3`
pub fn describe_plan(plan: &MountPlan) -> String {
    let arrows = match plan.arrows {
        Some(style) => format!("{}px+{}px", style.size, style.margin),
        None => "off".to_string(),
    };
    format!(
        "mount slides={} transition={} arrows={arrows} dots={}",
        plan.slides.len(),
        humantime::format_duration(plan.transition),
        plan.dot_slots
    )
}

pub fn timestamp(at: Duration) -> String {
    format!("t={}ms", at.as_millis())
}

/// Collects one line per renderer call, stamped with the virtual time the
/// driver last set.
#[derive(Debug, Default)]
pub struct TextRenderer {
    now: Duration,
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = now;
    }

    /// Record a driver-side line at the current time.
    pub fn note(&mut self, text: impl AsRef<str>) {
        let line = format!("{} {}", timestamp(self.now), text.as_ref());
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl SlideRenderer for TextRenderer {
    fn mount(&mut self, plan: &MountPlan) {
        self.note(describe_plan(plan));
    }

    fn render(&mut self, frame: &Frame) {
        self.note(describe_frame(frame));
    }

    fn unmount(&mut self) {
        self.note("unmount");
    }
}

/// Emits every renderer call through `tracing` for live runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl SlideRenderer for LogRenderer {
    fn mount(&mut self, plan: &MountPlan) {
        info!("{}", describe_plan(plan));
    }

    fn render(&mut self, frame: &Frame) {
        info!("{}", describe_frame(frame));
    }

    fn unmount(&mut self) {
        info!("unmount");
    }
}
