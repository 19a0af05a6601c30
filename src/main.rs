//! Thump: play seven sample pads from the keyboard or mouse.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{crate_version, Parser};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use thump::audio::AudioContext;
use thump::config::{self, Config};
use thump::instrument::{ControlState, Instrument, PadBank};
use thump::logging;
use thump::tui::{theme, App};

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "A terminal audio-pad instrument with a live spectrum visualizer."
)]
struct Cli {
    /// Config file. Defaults to ~/.thump/config.yaml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Bind the first seven .wav files of this directory to the pads.
    #[arg(short, long)]
    kit: Option<PathBuf>,
    /// Log file. Overrides `log_file` from the config.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log level or filter directive, e.g. `debug` or `thump=trace`.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Restores the terminal however the UI exits.
struct TerminalGuard {
    enhanced_keys: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        // Reports key repeats distinctly where the terminal supports it.
        let enhanced_keys = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
        Ok(Self { enhanced_keys })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced_keys {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(cli.config.as_deref())?;
    let log_path = logging::init(
        cli.log_file.as_deref().or(config.log_file.as_deref()),
        &cli.log_level,
    )?;
    info!(version = crate_version!(), log = %log_path.display(), "thump starting");

    let sources = match &cli.kit {
        Some(dir) => config::kit_sources(dir)?,
        None => config.sample_sources(),
    };
    let pads = PadBank::load(&sources);
    let controls = ControlState::new(config.volume, config.speed);
    let instrument = Instrument::new(pads, controls, AudioContext::with_default_device());
    let mut app = App::new(instrument, theme::load_theme(&config.theme), Instant::now());

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        warn!("no signal handler: {e}");
    }

    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    let result = app.run(&mut terminal, &interrupted);
    drop(terminal);
    drop(guard);

    result?;
    info!("thump exiting");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("thump: {e}");
        std::process::exit(1);
    }
}
