//! Configuration loading for slidekit.
//!
//! Resolves a [`slidekit_core::CarouselConfig`] from an explicit file, the
//! `SLIDEKIT_*` environment or default file locations, then runs guard rails
//! that reject unusable values and collect non-fatal warnings.

pub mod loader;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use validation::{
    ConfigGuardRailError, ConfigWarning, ConfigWarnings, apply_guard_rails,
};
