//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

/// A terminal spectrogram: live audio as a scrolling colour waterfall
#[derive(Parser)]
#[command(name = "livefft")]
#[command(version)]
#[command(about = "A terminal spectrogram: live audio as a scrolling colour waterfall")]
#[command(long_about = "A terminal spectrogram: live audio as a scrolling colour waterfall.\n\nDEFAULT COMMAND:\n    If no command is specified, 'run' is used by default.\n\nKEYS:\n    Up/Down      delay between frames\n    Left/Right   colour offset\n    [ / ]        colour range\n    - / +        frequency zoom\n    Space        pause\n    c            clock on wrap\n    p            party mode\n    q / Esc      quit\n\nSIGNALS:\n    SIGUSR1      toggle pause\n    SIGTERM      exit cleanly\n\nEXAMPLES:\n    $ livefft\n    $ livefft --demo\n    $ livefft run --device 2")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/livefft/livefft.toml\n    Logs:               ~/.local/state/livefft/livefft.log.*"
)]
struct Cli {
    /// Show a synthetic sweep instead of the microphone (run default command)
    #[arg(long, global = true)]
    demo: bool,

    /// Input device name or index, overriding the config (run default command)
    #[arg(short, long, value_name = "DEVICE", global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live waterfall (default)
    #[command(visible_alias = "r")]
    Run,

    /// Open configuration file in your preferred editor
    ///
    /// Creates the file with commented defaults on first use.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio input devices
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
    },

    /// Generate shell completion script
    ///
    /// Examples:
    ///   livefft completions bash > livefft.bash
    ///   livefft completions zsh > _livefft
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If the selected command fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Commands that print to the terminal and need no logging
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "livefft", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return commands::handle_list_devices(),
        Some(Commands::Logs { lines }) => return commands::handle_logs(*lines),
        _ => {}
    }

    logging::init_logging()?;

    match cli.command {
        None | Some(Commands::Run) => commands::handle_run(cli.demo, cli.device).await?,
        Some(Commands::Config) => commands::handle_config()?,
        Some(Commands::Completions { .. })
        | Some(Commands::ListDevices)
        | Some(Commands::Logs { .. }) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_takes_run_options() {
        let cli = Cli::try_parse_from(["livefft", "--demo", "-d", "2"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.demo);
        assert_eq!(cli.device.as_deref(), Some("2"));

        let cli = Cli::try_parse_from(["livefft", "run", "--demo"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run)));
        assert!(cli.demo);
    }

    #[test]
    fn test_logs_line_count() {
        let cli = Cli::try_parse_from(["livefft", "logs", "-n", "10"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Logs { lines: 10 })));
    }
}
