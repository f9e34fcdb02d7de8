//! Pagination dot windowing
//!
//! When a deck has more slides than visible dots, the fixed set of dot slots
//! is relabeled so the active slide stays inside the visible window instead
//! of scrolling a long strip.

use std::ops::Range;

/// One dot as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotSlot {
    /// Position of the dot in the strip.
    pub slot: usize,
    /// Slide index the dot currently represents.
    pub slide: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    /// Configured window size (W). May exceed the deck size.
    window: usize,
    total: usize,
    /// `labels[slot]` is the slide index represented by `slot`.
    labels: Vec<usize>,
    current: usize,
}

impl PaginationWindow {
    /// Create `min(window, total)` slots with the default labeling.
    pub fn new(window: usize, total: usize) -> Self {
        let window = window.max(1);
        let slots = window.min(total);
        Self {
            window,
            total,
            labels: (0..slots).collect(),
            current: 0,
        }
    }

    /// Recompute labels for a new current index.
    ///
    /// At or past the window size the window shifts so `current` is the last
    /// visible slot. Index 0 snaps back to the default labeling.
    pub fn update(&mut self, current: usize) {
        self.current = current;

        if current >= self.window {
            let start = current + 1 - self.window;
            self.relabel_from(start);
        }

        if current == 0 {
            self.relabel_from(0);
        }

        // A backward walk can leave `current` under a shifted window; the
        // default window always contains it since `current < window` here.
        if self.active_slot().is_none() {
            self.relabel_from(0);
        }
    }

    fn relabel_from(&mut self, start: usize) {
        for (slot, label) in self.labels.iter_mut().enumerate() {
            *label = start + slot;
        }
    }

    pub fn slot_count(&self) -> usize {
        self.labels.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Slide indices represented by the slots, in slot order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Contiguous range of slide indices currently visible.
    pub fn visible_range(&self) -> Range<usize> {
        match (self.labels.first(), self.labels.last()) {
            (Some(first), Some(last)) => *first..*last + 1,
            _ => 0..0,
        }
    }

    /// Slide index represented by `slot`, if the slot exists.
    pub fn slide_for_slot(&self, slot: usize) -> Option<usize> {
        self.labels.get(slot).copied()
    }

    /// Slot representing the current slide.
    pub fn active_slot(&self) -> Option<usize> {
        self.labels.iter().position(|&label| label == self.current)
    }

    pub fn dots(&self) -> Vec<DotSlot> {
        self.labels
            .iter()
            .enumerate()
            .map(|(slot, &slide)| DotSlot {
                slot,
                slide,
                active: slide == self.current,
            })
            .collect()
    }
}
