//! Thump: a terminal audio-pad instrument with a live spectrum visualizer.

pub mod audio;
pub mod config;
pub mod instrument;
pub mod logging;
pub mod timer;
pub mod tui;
pub mod visualizer;
