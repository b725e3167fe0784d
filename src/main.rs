use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute, terminal,
};
use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use flappy_term::assets::Assets;
use flappy_term::audio::{Audio, Sound};
use flappy_term::render::{PixelBuf, draw_list};
use flappy_term::{Config, ConfigError, Error, FileScoreStore, Game, Input};

// ── Terminal ────────────────────────────────────────────────────────────────

/// Raw mode + alternate screen for as long as it lives
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

// ── Input ───────────────────────────────────────────────────────────────────

enum Command {
    Input(Input),
    Resize(u16, u16),
    Quit,
}

fn map_event(ev: Event) -> Option<Command> {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char(' ') | KeyCode::Up => Some(Command::Input(Input::Flap)),
            KeyCode::Enter | KeyCode::Char('r') => Some(Command::Input(Input::Restart)),
            KeyCode::Char('f') | KeyCode::Char('p') => Some(Command::Input(Input::Pause)),
            _ => None,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Command::Input(Input::Flap))
        }
        Event::Resize(c, r) => Some(Command::Resize(c, r)),
        _ => None,
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

/// Log to a file; stderr belongs to the game screen
fn init_logging(config: &Config) {
    let file = match File::create(&config.log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "flappy-term: logging disabled, cannot open {}: {}",
                config.log_path.display(),
                e
            );
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run(config: Config) -> Result<(), Error> {
    let assets = Assets::load(&config)?;
    let audio = if config.audio {
        Audio::open()?
    } else {
        Audio::muted()
    };
    let store = FileScoreStore::new(&config.high_score_path);
    let mut game = Game::new(config.clone(), Box::new(store));

    let mut term = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let world = (config.screen_width, config.screen_height);

    let frame_dur = Duration::from_secs_f32(config.frame_budget());
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = (frame_start - last_frame)
            .as_secs_f32()
            .min(config.max_frame_dt);
        last_frame = frame_start;

        // Input
        while event::poll(Duration::ZERO)? {
            match map_event(event::read()?) {
                Some(Command::Quit) => {
                    log::info!("Quit requested");
                    return Ok(());
                }
                Some(Command::Input(input)) => game.press(input, dt),
                Some(Command::Resize(c, r)) => buf.resize(c as usize, r as usize * 2),
                None => {}
            }
        }

        // Update
        game.step(dt);
        for event in game.take_events() {
            if let Some(sound) = Sound::for_event(event) {
                audio.play(sound);
            }
        }

        // Render
        let list = draw_list(&game, &assets);
        buf.paint(&list, world);
        buf.render(&mut term.out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> ExitCode {
    let config_path = Config::default_path();
    let loaded = Config::load(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(&config);
    log::info!("flappy-term starting");
    match loaded {
        Ok(_) => log::info!("Loaded config from {}", config_path.display()),
        Err(ConfigError::Missing) => {
            log::info!("No config at {}, using defaults", config_path.display())
        }
        Err(e) => log::warn!("Ignoring config {}: {}", config_path.display(), e),
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("flappy-term: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
