use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tapseq::{
    config::{Config, ConfigStore, FileConfigStore, MAX_DECAY_DURATION_MS},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    session::MAX_TARGET_COUNT,
    App, Flow, Session, TICK_RATE_MS,
};
use tracing::{info, warn};

/// tap the numbered targets in order before they fade away
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction game for the terminal: numbered targets are scattered over the board and must be clicked (or typed) in ascending order. Every activated target fades out on its own countdown; a wrong number ends the round."
)]
pub struct Cli {
    /// number of targets per round (defaults to the last used value)
    #[clap(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TARGET_COUNT)))]
    points: Option<u32>,

    /// start a round immediately with autoplay switched on
    #[clap(long)]
    autoplay: bool,

    /// seed for target placement, for reproducible layouts
    #[clap(long)]
    seed: Option<u64>,

    /// how long an activated target takes to fade, in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DECAY_DURATION_MS)))]
    decay_ms: Option<u32>,

    /// countdown granularity, in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    decay_step_ms: Option<u32>,

    /// delay before autoplay taps the next target, in milliseconds
    #[clap(long)]
    autoplay_delay_ms: Option<u32>,

    /// preferences file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// where to write logs when RUST_LOG is set
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Command line values win over stored preferences
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(points) = self.points {
            cfg.target_count = points;
        }
        if let Some(ms) = self.decay_ms {
            cfg.decay_duration_ms = ms;
        }
        if let Some(ms) = self.decay_step_ms {
            cfg.decay_step_ms = ms;
        }
        if let Some(ms) = self.autoplay_delay_ms {
            cfg.autoplay_delay_ms = ms;
        }
        cfg
    }

    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Only the target count outlives a run; command line tuning is one-off
fn remembered(stored: Config, target_count: u32) -> Config {
    Config {
        target_count,
        ..stored
    }
}

fn build_app(cli: &Cli, cfg: &Config) -> App {
    let tuning = cfg.tuning();
    let mut session = match cli.seed {
        Some(seed) => Session::with_seed(tuning, seed),
        None => Session::new(tuning),
    };
    session.configure(cfg.target_count);
    if cli.autoplay {
        session.start();
        session.toggle_autoplay();
    }
    App::new(session)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = logging::init(cli.log_file.as_deref())? {
        info!(path = %path.display(), "logging enabled");
    }

    let store = cli.store();
    let cfg = cli.apply(store.load());
    cfg.validate()?;
    let mut app = build_app(&cli, &cfg);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let saved = remembered(store.load(), app.session.target_count());
    if let Err(e) = store.save(&saved) {
        warn!(error = %e, "could not save preferences");
    }

    result
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    let mut last_step = Instant::now();
    let mut drawn_revision = None;
    let mut dirty = true;

    loop {
        let revision = app.session.revision();
        if dirty || drawn_revision != Some(revision) {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            drawn_revision = Some(revision);
            dirty = false;
        }

        let event = runner.step();

        // game time follows the wall clock, whatever woke us up
        let now = Instant::now();
        let delta_ms = u32::try_from(now.duration_since(last_step).as_millis()).unwrap_or(u32::MAX);
        if delta_ms > 0 {
            app.on_tick(delta_ms);
            last_step = now;
        }

        match event {
            GameEvent::Tick => {}
            GameEvent::Resize => dirty = true,
            GameEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                dirty = true;
            }
            GameEvent::Mouse(mouse) => {
                let size = terminal.size()?;
                app.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
        }
    }

    Ok(())
}
