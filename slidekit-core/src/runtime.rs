//! Tokio event loop for a carousel
//!
//! Timers are tokio tasks that post [`CarouselEvent::Timer`] onto the same
//! channel the input source uses, so every transition still runs on the one
//! task that owns the controller. Each scheduled timer carries a generation;
//! events from a cancelled or replaced timer are dropped on arrival.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::config::CarouselConfig;
use crate::controller::CarouselController;
use crate::error::Result;
use crate::input::{Command, InputEvent};
use crate::render::SlideRenderer;
use crate::slide::SlideDeck;
use crate::timer::{TimerId, TimerService};

/// Message consumed by [`CarouselRuntime::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    Input(InputEvent),
    Command(Command),
    Timer { id: TimerId, generation: u64 },
    Shutdown,
}

#[derive(Debug)]
struct ScheduledTask {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Timer service backed by tokio tasks.
#[derive(Debug)]
pub struct TokioTimers {
    tx: mpsc::UnboundedSender<CarouselEvent>,
    tasks: HashMap<TimerId, ScheduledTask>,
    next_generation: u64,
}

impl TokioTimers {
    pub fn new(tx: mpsc::UnboundedSender<CarouselEvent>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Whether an event with this generation belongs to the live instance
    /// of `id`.
    pub fn is_current(&self, id: TimerId, generation: u64) -> bool {
        self.tasks
            .get(&id)
            .is_some_and(|task| task.generation == generation)
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.tasks.contains_key(&id)
    }

    fn track(&mut self, id: TimerId, generation: u64, handle: JoinHandle<()>) {
        if let Some(previous) =
            self.tasks.insert(id, ScheduledTask { generation, handle })
        {
            previous.handle.abort();
        }
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Forget a one-shot timer once its event has been delivered.
    fn complete(&mut self, id: TimerId, generation: u64) {
        if self.is_current(id, generation) {
            self.tasks.remove(&id);
        }
    }
}

impl TimerService for TokioTimers {
    fn schedule_repeating(&mut self, id: TimerId, period: Duration) {
        let generation = self.bump_generation();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(CarouselEvent::Timer { id, generation }).is_err() {
                    break;
                }
            }
        });
        trace!(?id, generation, "scheduled repeating timer");
        self.track(id, generation, handle);
    }

    fn schedule_once(&mut self, id: TimerId, delay: Duration) {
        let generation = self.bump_generation();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(CarouselEvent::Timer { id, generation });
        });
        trace!(?id, generation, "scheduled one-shot timer");
        self.track(id, generation, handle);
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.handle.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }
}

/// Cloneable sender side of a running carousel.
#[derive(Debug, Clone)]
pub struct CarouselHandle {
    tx: mpsc::UnboundedSender<CarouselEvent>,
}

impl CarouselHandle {
    /// Forward an input event. Returns false once the loop has stopped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(CarouselEvent::Input(event)).is_ok()
    }

    /// Forward a programmatic operation. Returns false once the loop has
    /// stopped.
    pub fn command(&self, command: Command) -> bool {
        self.tx.send(CarouselEvent::Command(command)).is_ok()
    }

    /// Ask the loop to destroy the controller and return.
    pub fn shutdown(&self) -> bool {
        self.tx.send(CarouselEvent::Shutdown).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns a controller and drives it from one channel.
#[derive(Debug)]
pub struct CarouselRuntime<R: SlideRenderer> {
    controller: CarouselController<R, TokioTimers>,
    rx: mpsc::UnboundedReceiver<CarouselEvent>,
}

impl<R: SlideRenderer> CarouselRuntime<R> {
    /// Build the controller inside a tokio context. Autoplay timers are
    /// spawned immediately when configured.
    pub fn new(
        deck: SlideDeck,
        config: CarouselConfig,
        renderer: R,
    ) -> Result<(Self, CarouselHandle)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let timers = TokioTimers::new(tx.clone());
        let controller =
            CarouselController::with_deck(deck, config, renderer, timers)?;
        Ok((Self { controller, rx }, CarouselHandle { tx }))
    }

    pub fn controller(&self) -> &CarouselController<R, TokioTimers> {
        &self.controller
    }

    /// Process events until shutdown, then destroy the controller and hand
    /// the renderer back.
    ///
    /// The runtime keeps a sender for its own timers, so the loop only ends
    /// through [`CarouselHandle::shutdown`].
    pub async fn run(mut self) -> R {
        while let Some(event) = self.rx.recv().await {
            match event {
                CarouselEvent::Input(input) => {
                    trace!(%input, "input event");
                    self.controller.handle_input(input);
                }
                CarouselEvent::Command(command) => {
                    trace!(?command, "command event");
                    self.controller.apply(command);
                }
                CarouselEvent::Timer { id, generation } => {
                    if !self.controller.timers().is_current(id, generation) {
                        trace!(?id, generation, "dropping stale timer event");
                        continue;
                    }
                    if id == TimerId::InteractionExpiry {
                        self.controller.timers_mut().complete(id, generation);
                    }
                    self.controller.on_timer(id);
                }
                CarouselEvent::Shutdown => {
                    debug!("carousel runtime shutting down");
                    break;
                }
            }
        }
        self.controller.destroy();
        self.controller.into_renderer()
    }
}
