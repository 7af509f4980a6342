//! Terminal front end: the waterfall view and the error screen.

pub mod error;
pub mod waterfall;

pub use error::ErrorScreen;
pub use waterfall::{PixelView, VisualizerCommand, WaterfallTui};
