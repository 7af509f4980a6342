//! Scrolling waterfall rendering.
//!
//! Everything needed to turn a stream of magnitude buffers into a colour-mapped,
//! vertically scrolling spectrogram: resampling onto pixel columns, the hue
//! mapping, scanline bookkeeping, user-adjustable parameters and the per-frame
//! renderer that ties them together. Nothing in here touches the terminal.

pub mod colour;
pub mod error;
pub mod overlay;
pub mod params;
pub mod renderer;
pub mod resample;
pub mod scan;
pub mod surface;

pub use colour::{colour, Rgb8};
pub use error::VisualError;
pub use overlay::{CellTextRenderer, Overlay, TextRenderer};
pub use params::{Control, StatusMessage, VisualizationParameters};
pub use renderer::FrameRenderer;
pub use resample::{resample, DisplayRange};
pub use scan::{ScanState, Wrapped};
pub use surface::{Cell, Glyph, PixelGrid, Surface};
