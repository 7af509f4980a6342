//! Live waterfall display.
//!
//! Drives the frame loop: poll input, render one frame, draw it, sleep for
//! the configured delay. SIGTERM ends the loop cleanly and SIGUSR1 toggles
//! pause from outside the terminal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::LivefftConfig;
use crate::source::{FftSource, MicrophoneCapture, SpectralSource, SweepGenerator};
use crate::ui::{ErrorScreen, VisualizerCommand, WaterfallTui};
use crate::visual::{
    CellTextRenderer, Control, FrameRenderer, Overlay, PixelGrid, Surface,
};

/// Sample rate of the synthetic sweep used by `--demo`
const DEMO_SAMPLE_RATE: u32 = 48_000;

/// Analysis blocks of history kept by the microphone capture
const CAPTURE_BLOCKS: usize = 4;

/// Runs the waterfall until the user quits.
///
/// # Arguments
/// * `demo` - Use the synthetic sweep instead of the microphone
/// * `device` - Input device overriding the configured one
///
/// # Errors
/// - If the configuration is invalid
/// - If the input device cannot be opened
/// - If the terminal cannot be driven
pub async fn handle_run(demo: bool, device: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== livefft started ===");

    let mut config = match LivefftConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            show_error(
                "Configuration Error",
                &format!("{err:#}\n\nPlease check ~/.config/livefft/livefft.toml and try again."),
            )?;
            return Err(err.context("Configuration error"));
        }
    };
    if let Some(device) = device {
        config.audio.device = device;
    }

    let params = config.display.to_parameters()?;
    tracing::info!(
        "Configuration loaded: device={}, fft_size={}, delay={}ms, range={:?}",
        config.audio.device,
        config.audio.fft_size,
        params.delay_ms(),
        params.fft_display_range()
    );

    let source = match open_source(&config, demo) {
        Ok(source) => source,
        Err(err) => {
            tracing::error!("Failed to open input: {err:#}");
            show_error(
                "Audio Input Error",
                &format!("{err:#}\n\nRun 'livefft list-devices' or try 'livefft --demo'."),
            )?;
            return Err(err);
        }
    };

    let mut tui = WaterfallTui::new().map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;
    let (width, height) = tui
        .surface_size()
        .map_err(|e| anyhow::anyhow!("Failed to query terminal size: {e}"))?;

    let overlay = Overlay::new(CellTextRenderer::default(), config.display.text_margin);
    let mut renderer = FrameRenderer::new(source, PixelGrid::new(width, height), params, overlay)
        .map_err(|e| anyhow::anyhow!("Terminal too small: {e}"))?;

    let terminate = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&terminate))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;
    let external_pause = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&external_pause))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    tracing::debug!("Entering frame loop ({}x{})", width, height);

    loop {
        if terminate.load(Ordering::Relaxed) {
            tracing::info!("Received SIGTERM: stopping");
            break;
        }
        if external_pause.swap(false, Ordering::Relaxed) {
            let message = renderer.apply(Control::TogglePause);
            tracing::info!("Received SIGUSR1: {message}");
        }

        match tui.handle_input() {
            Ok(VisualizerCommand::Continue) => {}
            Ok(VisualizerCommand::Quit) => break,
            Ok(VisualizerCommand::Adjust(control)) => {
                let message = renderer.apply(control);
                tracing::debug!("{message}");
            }
            Err(e) => {
                tracing::error!("Input handling error: {}", e);
                return Err(anyhow::anyhow!("Input handling error: {e}"));
            }
        }

        let (width, height) = tui
            .surface_size()
            .map_err(|e| anyhow::anyhow!("Failed to query terminal size: {e}"))?;
        let surface = renderer.surface();
        if (width, height) != (surface.width(), surface.height()) {
            if let Err(e) = renderer.resize(PixelGrid::new(width, height)) {
                // Keep drawing into the old surface until the terminal grows again
                tracing::warn!("Ignoring resize: {e}");
            }
        }

        renderer.update();
        if renderer.frames() % 1000 == 0 {
            tracing::debug!("Rendered {} frames", renderer.frames());
        }

        tui.draw(renderer.surface(), renderer.params())
            .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;

        tokio::time::sleep(renderer.recommended_interval()).await;
    }

    tui.cleanup()
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;

    tracing::info!("=== livefft exited after {} frames ===", renderer.frames());
    Ok(())
}

/// Builds the configured spectral source.
///
/// # Errors
/// - If the microphone cannot be started
fn open_source(config: &LivefftConfig, demo: bool) -> anyhow::Result<Box<dyn SpectralSource>> {
    let fft_size = config.audio.fft_size;

    if demo {
        tracing::info!("Demo mode: synthetic sweep at {}Hz", DEMO_SAMPLE_RATE);
        let sweep = SweepGenerator::new(DEMO_SAMPLE_RATE);
        return Ok(Box::new(FftSource::new(sweep, fft_size)));
    }

    let mut capture = MicrophoneCapture::new(config.audio.device.clone(), fft_size * CAPTURE_BLOCKS);
    capture.start()?;
    tracing::info!("Capturing at {}Hz", capture.sample_rate());
    Ok(Box::new(FftSource::new(capture, fft_size)))
}

/// Shows a blocking error screen and restores the terminal.
fn show_error(title: &str, message: &str) -> anyhow::Result<()> {
    let mut error_screen = ErrorScreen::new()?;
    error_screen.show_error(title, message)?;
    error_screen.cleanup()?;
    Ok(())
}
