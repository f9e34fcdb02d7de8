//! CarouselController: slide state machine and autoplay scheduler
//!
//! All transitions run to completion on `&mut self`; there is no shared state
//! and no locking. Timers live in the [`TimerService`], and fired timers are
//! delivered back through [`CarouselController::on_timer`].

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::CarouselConfig;
use crate::error::Result;
use crate::input::{Command, InputEvent};
use crate::navigation::{Direction, Origin, step_index, wrap_index};
use crate::pagination::PaginationWindow;
use crate::render::{ArrowStyle, Frame, MountPlan, SlideRenderer};
use crate::slide::{SlideContainer, SlideDeck};
use crate::timer::{TimerId, TimerService, VirtualTimers};

/// Mutable carousel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselState {
    pub current_index: usize,
    /// The repeating autoplay timer is scheduled.
    pub autoplay_active: bool,
    /// Inside the quiet period that follows a user interaction.
    pub user_interacted: bool,
    pub pointer_over: bool,
}

/// Scheduler state derived from [`CarouselState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Autoplay timer active and ticks advance slides.
    Running,
    /// No autoplay timer.
    Paused,
    /// Ticks are ignored until the interaction quiet period ends.
    Suppressed,
    /// Torn down; every call is a no-op.
    Destroyed,
}

#[derive(Debug)]
pub struct CarouselController<R, T>
where
    R: SlideRenderer,
    T: TimerService,
{
    config: CarouselConfig,
    deck: SlideDeck,
    state: CarouselState,
    pagination: Option<PaginationWindow>,
    renderer: R,
    timers: T,
    destroyed: bool,
}

impl<R, T> CarouselController<R, T>
where
    R: SlideRenderer,
    T: TimerService,
{
    /// Assemble the deck from `container` and the configured images, then
    /// build the controller.
    ///
    /// Fails with `ContainerNotFound` when `container` is `None` and with
    /// `NoSlidesProvided` when neither elements nor images exist. Nothing is
    /// mounted or scheduled on failure.
    pub fn new<C>(
        container: Option<&C>,
        config: CarouselConfig,
        renderer: R,
        timers: T,
    ) -> Result<Self>
    where
        C: SlideContainer + ?Sized,
    {
        config.validate()?;
        let deck = SlideDeck::assemble(container, &config)?;
        Self::with_deck(deck, config, renderer, timers)
    }

    /// Build a controller over an already assembled deck.
    ///
    /// Mounts the renderer, renders slide 0 and starts autoplay when
    /// configured.
    pub fn with_deck(
        deck: SlideDeck,
        config: CarouselConfig,
        renderer: R,
        timers: T,
    ) -> Result<Self> {
        config.validate()?;

        let pagination = config
            .pagination_window(deck.len())
            .map(|window| PaginationWindow::new(window, deck.len()));

        let mut controller = Self {
            config,
            deck,
            state: CarouselState::default(),
            pagination,
            renderer,
            timers,
            destroyed: false,
        };

        let plan = controller.mount_plan();
        controller.renderer.mount(&plan);
        controller.render();

        info!(
            slides = controller.deck.len(),
            autoplay = controller.config.autoplay,
            delay_ms = controller.config.delay_ms,
            dots = plan.dot_slots,
            "carousel initialized"
        );

        if controller.config.autoplay {
            controller.start_autoplay();
        }

        Ok(controller)
    }

    fn mount_plan(&self) -> MountPlan {
        MountPlan {
            slides: self.deck.slides().to_vec(),
            transition: self.config.transition_duration(),
            arrows: self.config.arrows.then(|| {
                ArrowStyle::new(self.config.arrow_size, self.config.arrow_margin)
            }),
            dot_slots: self
                .pagination
                .as_ref()
                .map_or(0, PaginationWindow::slot_count),
        }
    }

    // ===== Navigation =====

    /// Step one slide forward, wrapping past the last slide.
    pub fn next(&mut self, origin: Origin) {
        self.advance(Direction::Forward, origin);
    }

    /// Step one slide backward, wrapping past the first slide.
    pub fn prev(&mut self, origin: Origin) {
        self.advance(Direction::Backward, origin);
    }

    pub fn advance(&mut self, direction: Direction, origin: Origin) {
        if self.destroyed {
            trace!(?direction, "advance ignored after destroy");
            return;
        }
        let target =
            step_index(self.state.current_index, direction, self.deck.len());
        self.transition(target, origin);
    }

    /// Jump to `index`, normalizing out-of-range values by wraparound.
    /// Always counts as a user interaction.
    pub fn go_to(&mut self, index: i64) {
        if self.destroyed {
            trace!(index, "go_to ignored after destroy");
            return;
        }
        let target = wrap_index(index, self.deck.len());
        self.transition(target, Origin::UserAction);
    }

    /// Resolve a dot slot through the pagination window and jump there.
    pub fn dot_clicked(&mut self, slot: usize) {
        if self.destroyed {
            return;
        }
        let Some(slide) = self
            .pagination
            .as_ref()
            .and_then(|window| window.slide_for_slot(slot))
        else {
            warn!(slot, "ignoring click on unknown pagination slot");
            return;
        };
        self.go_to(slide as i64);
    }

    fn transition(&mut self, target: usize, origin: Origin) {
        let from = self.state.current_index;
        self.state.current_index = target;
        if let Some(window) = self.pagination.as_mut() {
            window.update(target);
        }
        self.render();

        debug!(from, to = target, ?origin, "slide transition");

        if origin.is_user() {
            self.handle_user_interaction();
        }
    }

    fn render(&mut self) {
        let dots = self
            .pagination
            .as_ref()
            .map(PaginationWindow::dots)
            .unwrap_or_default();
        let frame = Frame::new(self.state.current_index, self.deck.len(), dots);
        self.renderer.render(&frame);
    }

    // ===== Scheduling =====

    /// (Re)start the repeating autoplay tick.
    pub fn start_autoplay(&mut self) {
        if self.destroyed {
            return;
        }
        self.pause();
        self.timers
            .schedule_repeating(TimerId::Autoplay, self.config.delay());
        self.state.autoplay_active = true;
        debug!(delay_ms = self.config.delay_ms, "autoplay started");
    }

    /// Cancel the autoplay tick. Idempotent.
    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.timers.cancel(TimerId::Autoplay);
        if std::mem::take(&mut self.state.autoplay_active) {
            debug!("autoplay paused");
        }
    }

    fn handle_user_interaction(&mut self) {
        self.state.user_interacted = true;
        self.pause();
        self.timers.cancel(TimerId::InteractionExpiry);
        let quiet = self.config.interaction_quiet_period();
        self.timers
            .schedule_once(TimerId::InteractionExpiry, quiet);
        debug!(quiet_ms = quiet.as_millis() as u64, "autoplay suppressed");
    }

    /// Deliver a fired timer.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.destroyed {
            trace!(?id, "timer ignored after destroy");
            return;
        }
        match id {
            TimerId::Autoplay => {
                if self.state.user_interacted {
                    trace!("autoplay tick suppressed");
                } else {
                    self.next(Origin::Tick);
                }
            }
            TimerId::InteractionExpiry => {
                self.state.user_interacted = false;
                debug!("interaction quiet period expired");
                if self.config.autoplay {
                    self.start_autoplay();
                }
            }
        }
    }

    pub fn pointer_entered(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.pointer_over = true;
        self.pause();
    }

    /// Resume autoplay unless a user interaction quiet period is running.
    pub fn pointer_left(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.pointer_over = false;
        if !self.state.user_interacted {
            self.start_autoplay();
        }
    }

    /// Route an input-source event, honouring which controls are wired.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PrevClicked | InputEvent::NextClicked
                if !self.config.arrows =>
            {
                trace!(%event, "arrows disabled");
            }
            InputEvent::DotClicked(_) if self.pagination.is_none() => {
                trace!(%event, "pagination disabled");
            }
            InputEvent::PointerEntered | InputEvent::PointerLeft
                if !self.config.pause_on_pointer_over =>
            {
                trace!(%event, "pointer suppression disabled");
            }
            InputEvent::PrevClicked => self.prev(Origin::UserAction),
            InputEvent::NextClicked => self.next(Origin::UserAction),
            InputEvent::DotClicked(slot) => self.dot_clicked(slot),
            InputEvent::PointerEntered => self.pointer_entered(),
            InputEvent::PointerLeft => self.pointer_left(),
        }
    }

    /// Run a programmatic operation. Unlike [`Self::handle_input`] these are
    /// never gated by the control wiring.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::GoTo(index) => self.go_to(index),
            Command::Pause => self.pause(),
            Command::StartAutoplay => self.start_autoplay(),
        }
    }

    /// Cancel both timers and unmount. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.timers.cancel(TimerId::Autoplay);
        self.timers.cancel(TimerId::InteractionExpiry);
        self.state.autoplay_active = false;
        self.destroyed = true;
        self.renderer.unmount();
        info!("carousel destroyed");
    }

    // ===== Accessors =====

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        if self.destroyed {
            SchedulerState::Destroyed
        } else if self.state.user_interacted {
            SchedulerState::Suppressed
        } else if self.state.autoplay_active {
            SchedulerState::Running
        } else {
            SchedulerState::Paused
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn pagination(&self) -> Option<&PaginationWindow> {
        self.pagination.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    #[cfg(feature = "runtime")]
    pub(crate) fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

impl<R: SlideRenderer> CarouselController<R, VirtualTimers> {
    /// Move virtual time forward by `by`, delivering every timer that falls
    /// due, in deadline order.
    pub fn advance_clock(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        self.advance_clock_to(until);
    }

    /// Move virtual time to `until` (no-op if already past it).
    pub fn advance_clock_to(&mut self, until: Duration) {
        while let Some(id) = self.timers.pop_due(until) {
            self.on_timer(id);
        }
        self.timers.advance_to(until);
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }
}
