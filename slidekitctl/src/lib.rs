//! slidekitctl: command-line driver for slidekit carousels.
//!
//! `check` validates configuration, `simulate` replays a carousel on a
//! virtual clock, `run` drives one on tokio from stdin, and `play` opens a
//! terminal UI.

pub mod cli;
