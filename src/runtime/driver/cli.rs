use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::error::GridError;
use crate::runtime::BentoRuntime;
use crate::surface::AnsiSurface;

/// Poll timeout while no debounced pass is pending.
const IDLE_POLL: Duration = Duration::from_millis(200);

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] GridError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Minimal terminal driver that owns a grid runtime and manages raw mode +
/// alternate screen transitions. Terminal resize events feed the runtime's
/// debouncer; the poll timeout tracks the pending debounce deadline so a
/// quiet terminal still fires its pass on time.
///
/// `run` reports the real terminal size before its first recalculation, so
/// a surface built unmeasured paints for the first time inside the
/// alternate screen rather than over the shell prompt.
///
/// `q`, `Esc` or `ctrl-c` exits.
pub struct CliDriver {
    runtime: BentoRuntime<AnsiSurface<Stdout>>,
}

impl CliDriver {
    pub fn new(runtime: BentoRuntime<AnsiSurface<Stdout>>) -> Self {
        Self { runtime }
    }

    pub fn run(mut self) -> DriverResult<()> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner();
        self.exit(&mut stdout);
        result
    }

    fn run_inner(&mut self) -> DriverResult<()> {
        let (width, height) = terminal::size()?;
        self.runtime.surface_mut().set_viewport(width, height);
        self.runtime.recalculate()?;

        loop {
            let timeout = self
                .runtime
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if is_quit(&key) => break,
                    Event::Resize(columns, rows) => {
                        self.runtime.surface_mut().set_viewport(columns, rows);
                        self.runtime.signal_resize(Instant::now());
                    }
                    _ => {}
                }
            }

            self.runtime.tick(Instant::now())?;
        }

        Ok(())
    }

    fn enter(&self, stdout: &mut impl io::Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl io::Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
