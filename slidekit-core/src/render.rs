//! Renderer contract
//!
//! The controller never touches a UI toolkit. Everything visual goes through
//! [`SlideRenderer`]: one mount, a frame per index change, one unmount.

use std::time::Duration;

use crate::pagination::DotSlot;
use crate::slide::Slide;

/// Arrow control geometry, present only when arrows are enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStyle {
    pub size: u32,
    pub margin: u32,
    /// Glyph size inside the arrow button.
    pub glyph_size: f32,
}

impl ArrowStyle {
    pub fn new(size: u32, margin: u32) -> Self {
        Self {
            size,
            margin,
            glyph_size: size as f32 / 2.5,
        }
    }
}

/// Everything a renderer needs to build the carousel scaffolding once.
#[derive(Debug, Clone, PartialEq)]
pub struct MountPlan {
    pub slides: Vec<Slide>,
    pub transition: Duration,
    pub arrows: Option<ArrowStyle>,
    /// Number of dot slots to create; zero when pagination is disabled.
    pub dot_slots: usize,
}

/// Visual state of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideVisibility {
    pub index: usize,
    pub active: bool,
    /// Always the inverse of `active`.
    pub hidden: bool,
}

/// Complete visual state after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub active: usize,
    pub slides: Vec<SlideVisibility>,
    pub dots: Vec<DotSlot>,
}

impl Frame {
    pub fn new(active: usize, total: usize, dots: Vec<DotSlot>) -> Self {
        let slides = (0..total)
            .map(|index| SlideVisibility {
                index,
                active: index == active,
                hidden: index != active,
            })
            .collect();
        Self {
            active,
            slides,
            dots,
        }
    }

    pub fn active_dot(&self) -> Option<&DotSlot> {
        self.dots.iter().find(|dot| dot.active)
    }
}

/// Consumer of carousel visual state.
///
/// `render` must synchronously update every slide and every pagination slot
/// before returning.
pub trait SlideRenderer {
    /// Called once after a successful construction.
    fn mount(&mut self, _plan: &MountPlan) {}

    fn render(&mut self, frame: &Frame);

    /// Called once on teardown.
    fn unmount(&mut self) {}
}

impl<R: SlideRenderer + ?Sized> SlideRenderer for Box<R> {
    fn mount(&mut self, plan: &MountPlan) {
        (**self).mount(plan);
    }

    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }

    fn unmount(&mut self) {
        (**self).unmount();
    }
}

/// Renderer that records every call, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    mounted: Option<MountPlan>,
    frames: Vec<Frame>,
    unmounted: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_plan(&self) -> Option<&MountPlan> {
        self.mounted.as_ref()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn render_count(&self) -> usize {
        self.frames.len()
    }

    /// Active index of every rendered frame, in order.
    pub fn active_history(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.active).collect()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }
}

impl SlideRenderer for RecordingRenderer {
    fn mount(&mut self, plan: &MountPlan) {
        self.mounted = Some(plan.clone());
    }

    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn unmount(&mut self) {
        self.unmounted = true;
    }
}
