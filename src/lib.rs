//! livefft: a real-time scrolling spectrogram for the terminal.
//!
//! The [`visual`] module is the rendering core and has no terminal
//! dependencies; [`source`] supplies magnitude buffers, [`ui`] puts the result
//! on screen and [`app`] wires it all to the command line.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod setup;
pub mod source;
pub mod ui;
pub mod visual;
