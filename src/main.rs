mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use recite::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    confusion::ConfusionTable,
    headless::run_headless,
    passages::{Difficulty, PassageLibrary, SinglePassage, TextProvider},
    runtime::{crossterm_events, FixedTicker, ReciteEvent, Runner},
    session::{Session, SessionConfig},
    speech::TranscriptBuffer,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "RECITE_LOG";

/// read-aloud tutor tui: follow along word by word as you read a passage out loud
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A read-aloud tutor that tracks each spoken word against a reference passage, scoring it with edit distance and a homophone table, and cheering you on as your streak grows."
)]
pub struct Cli {
    /// reading level to pull passages from (defaults to the saved level)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// passage to start on within the level
    #[clap(short = 'i', long, default_value_t = 0)]
    index: usize,

    /// custom passage to read instead of the bundled library
    #[clap(short = 't', long)]
    text: Option<String>,

    /// level judged with exact word matching; other levels allow near misses and homophones
    #[clap(long, value_enum)]
    strict_level: Option<Difficulty>,

    /// how long feedback messages stay visible, in milliseconds
    #[clap(long)]
    feedback_ms: Option<u64>,

    /// let a word marked incorrect be attempted again instead of staying wrong until reset
    #[clap(long)]
    retry_incorrect: bool,

    /// publish every keystroke as a partial transcript instead of whole words (flexible levels only).
    /// A prefix one letter short can be accepted early; the rest of that word is then heard
    /// against the next word and marks it incorrect until reset
    #[clap(long)]
    partials: bool,

    /// read transcript updates from stdin and print one JSON snapshot per line
    #[clap(long)]
    headless: bool,
}

impl Cli {
    /// Overlay command line flags on the stored configuration
    fn apply(&self, cfg: &mut Config) {
        if let Some(difficulty) = self.difficulty {
            cfg.difficulty = difficulty;
        }
        if let Some(level) = self.strict_level {
            cfg.strict_difficulty = level;
        }
        if let Some(ms) = self.feedback_ms {
            cfg.feedback_ms = ms;
        }
        if self.retry_incorrect {
            cfg.retry_incorrect = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Reading,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub session: Session<Box<dyn TextProvider>>,
    pub speech: TranscriptBuffer,
    pub state: AppState,
    partials: bool,
}

impl App {
    pub fn new(session: Session<Box<dyn TextProvider>>, partials: bool) -> Self {
        let mut app = Self {
            session,
            speech: TranscriptBuffer::new(partials),
            state: AppState::Reading,
            partials,
        };
        app.sync_partials();
        app
    }

    /// Strict matching would fail every unfinished word, so partials only
    /// stream while the policy can hold them as in progress.
    fn sync_partials(&mut self) {
        let stream = self.partials && self.session.policy().tolerates_partials();
        self.speech.set_publish_partials(stream);
    }

    fn restart(&mut self) {
        self.speech.clear();
        self.sync_partials();
        self.state = AppState::Reading;
    }

    fn publish(&mut self, c: Option<char>) {
        let listening = self.speech.is_listening();
        let transcript = match c {
            Some(c) => self.speech.push(c),
            None => self.speech.backspace(),
        };
        if let Some(transcript) = transcript {
            self.session
                .apply_transcript(transcript, listening, Instant::now());
        }
        if self.session.is_finished() {
            let summary = self.session.recital().summary();
            info!(
                correct = summary.correct,
                words = summary.words,
                best_streak = summary.best_streak,
                "Passage complete"
            );
            self.state = AppState::Results;
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Flow::Quit;
        }

        match (self.state, key.code) {
            (_, KeyCode::Left) | (AppState::Results, KeyCode::Char('r')) => {
                self.session.reset();
                self.restart();
            }
            (_, KeyCode::Right) | (AppState::Results, KeyCode::Char('n')) => {
                self.session.advance_reference();
                self.restart();
            }
            (_, KeyCode::Up) => {
                let level = self.session.difficulty().harder();
                self.session.set_difficulty(level);
                self.restart();
            }
            (_, KeyCode::Down) => {
                let level = self.session.difficulty().easier();
                self.session.set_difficulty(level);
                self.restart();
            }
            (AppState::Reading, KeyCode::Tab) => {
                let listening = self.speech.toggle_listening();
                info!(listening, "Listening toggled");
            }
            (AppState::Reading, KeyCode::Backspace) => self.publish(None),
            (AppState::Reading, KeyCode::Enter) => self.publish(Some(' ')),
            (AppState::Reading, KeyCode::Char(c)) => self.publish(Some(c)),
            _ => {}
        }
        Flow::Continue
    }
}

fn init_tracing(headless: bool) {
    let default_level = if headless { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return;
    }

    // the alternate screen owns stdout/stderr, so the TUI logs to a file
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.headless);

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);

    let provider: Box<dyn TextProvider> = match &cli.text {
        Some(text) => Box::new(SinglePassage::new(text.clone())),
        None => Box::new(PassageLibrary::load(&config.locale)?),
    };
    let confusions = ConfusionTable::for_locale(&config.locale)?;

    let mut session_config = SessionConfig::from(&config);
    session_config.passage_index = cli.index % provider.passage_count(config.difficulty).max(1);
    info!(
        difficulty = %session_config.difficulty,
        index = session_config.passage_index,
        policy = %session_config.policy(),
        confusions = confusions.len(),
        "Starting session"
    );
    let mut session = Session::new(provider, session_config, confusions);

    if cli.headless {
        run_headless(&mut session, stdin().lock(), io::stdout().lock())?;
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty (use --headless for piped input)")
            .exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, cli.partials);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // only the level is remembered; other flags stay one-off
    let mut saved = store.load();
    saved.difficulty = app.session.difficulty();
    if let Err(err) = store.save(&saved) {
        warn!(path = %store.path().display(), %err, "Could not save config");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        crossterm_events(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            ReciteEvent::Tick(now) => {
                let was_visible = app.session.feedback().is_visible();
                app.session.tick(now);
                if was_visible != app.session.feedback().is_visible() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            ReciteEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            ReciteEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
