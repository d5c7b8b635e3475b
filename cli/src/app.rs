use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::time::Duration;
use sweeper_core::*;
use web_time::Instant;

use crate::command::{Command, HELP};
use crate::render::{render_board, render_status};

/// Elapsed-time counter shown next to the board. Lives outside the engine and is
/// only ever started, stopped or restarted by the app.
#[derive(Debug)]
pub struct Stopwatch {
    started_at: Instant,
    stopped_after: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            stopped_after: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.stopped_after
            .unwrap_or_else(|| self.started_at.elapsed())
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn stop(&mut self) {
        if self.stopped_after.is_none() {
            self.stopped_after = Some(self.started_at.elapsed());
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_after.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The board changed and should be drawn again.
    Redraw,
    Unchanged,
    Quit,
}

pub struct App {
    session: GameSession,
    strategy: PlacementStrategy,
    fixed_seed: Option<u64>,
    stopwatch: Stopwatch,
}

impl App {
    pub fn new(config: GameConfig, strategy: PlacementStrategy, fixed_seed: Option<u64>) -> Self {
        let seed = fixed_seed.unwrap_or_else(rand::random);
        Self {
            session: GameSession::with_strategy(config, seed, strategy),
            strategy,
            fixed_seed,
            stopwatch: Stopwatch::start(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    fn next_seed(&self) -> u64 {
        self.fixed_seed.unwrap_or_else(rand::random)
    }

    fn restart(&mut self, config: GameConfig) {
        self.session = GameSession::with_strategy(config, self.next_seed(), self.strategy);
        self.stopwatch = Stopwatch::start();
    }

    /// Applies one command, returning whether to redraw and a line of feedback
    /// for the player if any.
    pub fn handle(&mut self, command: Command) -> (Step, Option<String>) {
        use Step::*;
        log::debug!("Handling {:?}", command);

        let (step, feedback) = match command {
            Command::Reveal(coords) => match self.session.reveal(coords) {
                Ok(reveal) => {
                    log::debug!("{:?}, opened {} cells", reveal.outcome, reveal.opened.len());
                    let step = if reveal.outcome.has_update() { Redraw } else { Unchanged };
                    (step, None)
                }
                Err(err) => (Unchanged, Some(err.to_string())),
            },
            Command::Flag(coords) => match self.session.toggle_flag(coords) {
                Ok(outcome) if outcome.has_update() => (Redraw, None),
                Ok(_) => (Unchanged, None),
                Err(err) => (Unchanged, Some(err.to_string())),
            },
            Command::NewGame => {
                self.restart(self.session.config());
                (Redraw, None)
            }
            Command::Difficulty(difficulty) => {
                self.restart(difficulty.config());
                (Redraw, Some(format!("Switched to {}", difficulty.name())))
            }
            Command::Help => (Unchanged, Some(HELP.to_owned())),
            Command::Quit => return (Quit, None),
        };

        if self.session.phase().is_terminal() && !self.stopwatch.is_stopped() {
            self.stopwatch.stop();
            log::debug!("Clock stopped at {}s", self.stopwatch.elapsed_secs());
        }
        (step, feedback)
    }

    fn draw(&self, output: &mut impl Write) -> Result<()> {
        let snapshot = self.session.snapshot();
        write!(output, "{}", render_board(&snapshot))?;
        writeln!(
            output,
            "{}",
            render_status(&snapshot, self.stopwatch.elapsed_secs())
        )?;
        Ok(())
    }

    /// Reads commands line by line until `q` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        self.draw(&mut output)?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let (step, feedback) = match line.parse::<Command>() {
                Ok(command) => self.handle(command),
                Err(err) => (Step::Unchanged, Some(err.to_string())),
            };

            if step == Step::Quit {
                break;
            }
            if let Some(feedback) = feedback {
                writeln!(output, "{feedback}")?;
            }
            if step == Step::Redraw {
                self.draw(&mut output)?;
            }
        }

        output.flush().context("Failed to flush output")?;
        Ok(())
    }
}
