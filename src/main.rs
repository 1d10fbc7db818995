mod ui;

use clack::{
    config::{Config, ConfigStore, FileConfigStore},
    language::{Language, DEFAULT_LANGUAGE},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner, TICK_RATE},
    session::SessionConfig,
    viewport::ScrollAdapter,
    Change, Phase, SessionDuration, SessionObserver, TypingTest,
};
use clap::{builder::RangedU64ValueParser, error::ErrorKind, CommandFactory, Parser};
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
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// timed typing test with live wpm, cpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: type the scrolling stream of random words and watch words-per-minute, characters-per-minute and accuracy update as you go."
)]
pub struct Cli {
    /// number of seconds to run each test
    #[clap(short = 's', long, value_enum)]
    seconds: Option<SessionDuration>,

    /// json word list ({"name", "size", "words"}) to use instead of the built-in list
    #[clap(long)]
    word_list: Option<PathBuf>,

    /// number of words generated for a fresh test
    #[clap(long)]
    initial_words: Option<usize>,

    /// extend the text once this many characters or fewer remain ahead of the cursor
    #[clap(long)]
    refill_threshold: Option<usize>,

    /// number of words appended each time the text is extended
    #[clap(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    refill_batch: Option<usize>,
}

impl Cli {
    /// Overlay command line flags on the persisted configuration
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(seconds) = self.seconds {
            cfg.duration = seconds;
        }
        if let Some(ref path) = self.word_list {
            cfg.word_list = Some(path.clone());
        }
        if let Some(n) = self.initial_words {
            cfg.initial_words = n;
        }
        if let Some(n) = self.refill_threshold {
            cfg.refill_threshold = n;
        }
        if let Some(n) = self.refill_batch {
            cfg.refill_batch = n;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub test: TypingTest,
    /// Settings as loaded from disk, before command line overrides. Only the
    /// duration is changed before they are written back.
    pub stored: Config,
    /// Duration shown in the picker; applied whenever the test is not running.
    pub selected: SessionDuration,
    /// Text stays veiled until the user starts for the first time.
    pub revealed: bool,
    pub show_results: bool,
    pub scroll: ScrollAdapter,
}

impl App {
    pub fn new(language: Language, config: Config) -> Self {
        let test = TypingTest::new(language, SessionConfig::from(&config));
        Self {
            selected: test.duration(),
            test,
            stored: config,
            revealed: false,
            show_results: false,
            scroll: ScrollAdapter::default(),
        }
    }

    pub fn with_stored(mut self, stored: Config) -> Self {
        self.stored = stored;
        self
    }

    pub fn restart(&mut self) {
        if self.test.reset(self.selected) {
            self.revealed = true;
            self.show_results = false;
        }
    }

    fn cycle_duration(&mut self, forward: bool) {
        if self.test.phase() == Phase::Running {
            return;
        }
        self.selected = if forward {
            self.selected.next()
        } else {
            self.selected.prev()
        };
        self.test.select_duration(self.selected);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        match (self.test.phase(), key.code) {
            (_, KeyCode::Left) => self.cycle_duration(false),
            (_, KeyCode::Right) => self.cycle_duration(true),
            (Phase::Over, KeyCode::Enter | KeyCode::Char('r')) => self.restart(),
            (Phase::Over, KeyCode::Char('c')) => self.show_results = false,
            (Phase::Over, _) => {}
            (Phase::NotStarted, KeyCode::Enter) => self.revealed = true,
            (_, KeyCode::Backspace) => self.test.backspace(),
            (_, KeyCode::Char(c)) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.revealed = true;
                    self.test.forward_keystroke(c);
                }
            }
            _ => {}
        }
        Control::Continue
    }

    pub fn on_tick(&mut self) {
        self.test.tick();
    }

    /// Forward pending state changes to the presentation side. Returns true
    /// when the countdown started during the last batch of changes.
    pub fn sync(&mut self, now: Instant) -> bool {
        let mut started = false;
        for change in self.test.take_changes() {
            self.scroll.on_change(&change, now);
            match change {
                Change::Started => started = true,
                Change::Finished(_) => self.show_results = true,
                _ => {}
            }
        }
        started
    }

    pub fn persist<S: ConfigStore>(&mut self, store: &S) {
        self.stored.duration = self.selected;
        if let Err(err) = store.save(&self.stored) {
            tracing::warn!("Failed to save config: {err}");
        }
    }
}

fn load_language(config: &Config) -> Result<Language, Box<dyn Error>> {
    let language = match config.word_list {
        Some(ref path) => Language::from_path(path)?,
        None => Language::builtin(DEFAULT_LANGUAGE)?,
    };
    tracing::info!(
        name = %language.name,
        words = language.words.len(),
        "word list loaded"
    );
    Ok(language)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init_logging();

    let store = FileConfigStore::new();
    let stored = store.load();
    let config = cli.apply(stored.clone());
    let language = load_language(&config)?;
    let mut app = App::new(language, config).with_stored(stored);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.persist(&store);
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(TICK_RATE));

    loop {
        let width = ui::text_width(terminal.size()?.width);
        app.scroll.poll(
            Instant::now(),
            app.test.sequence(),
            app.test.state().cursor,
            width,
        );
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step(app.scroll.deadline()) {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Wake => {}
            AppEvent::Resize => {
                let width = ui::text_width(terminal.size()?.width);
                app.scroll
                    .scroll_to_active(app.test.sequence(), app.test.state().cursor, width);
            }
            AppEvent::Key(key) => {
                if app.handle_key(key) == Control::Quit {
                    break;
                }
            }
        }

        let now = Instant::now();
        if app.sync(now) {
            // the countdown runs from the first keystroke, not from launch
            runner.restart_ticks(now);
        }
    }

    Ok(())
}
