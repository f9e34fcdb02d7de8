//! Core library for slidekit.
//!
//! A carousel is a fixed deck of slides cycled by a [`CarouselController`]:
//! circular navigation, an autoplay tick that steps aside for a quiet period
//! after every user interaction, and a pagination window that keeps the
//! active dot visible when there are more slides than dots. Rendering and
//! timekeeping sit behind the [`SlideRenderer`] and [`TimerService`] traits,
//! so the state machine runs headless with [`VirtualTimers`] or live on tokio
//! through [`runtime::CarouselRuntime`].

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod navigation;
pub mod pagination;
pub mod render;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod slide;
pub mod timer;

pub use config::CarouselConfig;
pub use controller::{CarouselController, CarouselState, SchedulerState};
pub use error::{CarouselError, ConfigError, Result};
pub use input::{Command, InputEvent, ParseInputError};
pub use navigation::{Direction, Origin};
pub use pagination::{DotSlot, PaginationWindow};
pub use render::{
    ArrowStyle, Frame, MountPlan, RecordingRenderer, SlideRenderer,
    SlideVisibility,
};
#[cfg(feature = "runtime")]
pub use runtime::{CarouselEvent, CarouselHandle, CarouselRuntime, TokioTimers};
pub use slide::{
    ContainerElement, Slide, SlideContainer, SlideDeck, SlideSource,
    StaticContainer,
};
pub use timer::{TimerId, TimerService, VirtualTimers};
