//! Game controller: the fixed-rate loop
//!
//! Owns the platform, the score store and the frame clock, and drives one
//! run: name entry, the tick/render loop, then the game-over summary.

use std::io;

use thiserror::Error;

use crate::Color;
use crate::consts::NAME_MAX_LEN;
use crate::highscores::{ScoreRecord, ScoreStore};
use crate::platform::{FrameClock, InputEvent, InputSource, NameEntry, Renderer};
use crate::settings::Settings;
use crate::sim::{Entity, GameSession, TickInput, tick};

/// Failures that end a run early
#[derive(Debug, Error)]
pub enum GameError {
    #[error("platform I/O failed: {0}")]
    Platform(#[from] io::Error),
}

/// Result of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub name: String,
    pub score: u64,
    /// Whether the score reached the store
    pub saved: bool,
    /// Best records after saving (empty if the query failed)
    pub leaderboard: Vec<ScoreRecord>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Player collided; the summary was shown
    Completed(GameSummary),
    /// Player quit; nothing was saved
    Aborted,
}

/// Drives one game from name entry to the summary screen
pub struct GameController<P, S, C> {
    platform: P,
    store: S,
    clock: C,
    settings: Settings,
}

impl<P, S, C> GameController<P, S, C>
where
    P: Renderer + InputSource,
    S: ScoreStore,
    C: FrameClock,
{
    pub fn new(platform: P, store: S, clock: C, settings: Settings) -> Self {
        Self {
            platform,
            store,
            clock,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    /// Ask for a name, then play a full session
    pub fn run(&mut self) -> Result<RunOutcome, GameError> {
        let arena = self.settings.arena();
        let name = NameEntry::new(NAME_MAX_LEN).run(&mut self.platform, &mut self.clock, &arena)?;
        let Some(name) = name else {
            log::info!("Quit during name entry");
            return Ok(RunOutcome::Aborted);
        };

        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let session = GameSession::new(name, &self.settings.session_config(), seed);
        self.play(session)
    }

    /// Run the tick loop on `session` until collision or quit
    pub fn play(&mut self, mut session: GameSession) -> Result<RunOutcome, GameError> {
        let dt = self.settings.tick_dt();

        loop {
            if self.quit_requested()? {
                log::info!("Quit mid-game at score {}, discarding run", session.score());
                return Ok(RunOutcome::Aborted);
            }

            let input = TickInput::from(self.platform.poll_held_keys());
            let alive = tick(&mut session, &input, dt);
            self.draw_session(&session)?;

            if !alive {
                break;
            }
            self.clock.wait_for_next_frame();
        }

        let summary = self.finish(&session);
        self.draw_summary(&summary)?;
        self.clock.pause(self.settings.game_over_delay());
        Ok(RunOutcome::Completed(summary))
    }

    fn quit_requested(&mut self) -> io::Result<bool> {
        let events = self.platform.poll_events()?;
        Ok(events.contains(&InputEvent::Quit))
    }

    /// Persist the score and fetch the leaderboard. Store failures are
    /// logged and folded into the summary.
    fn finish(&mut self, session: &GameSession) -> GameSummary {
        let player = session.player();

        let saved = match self.store.save(&player.name, player.score) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Could not save score for {:?}: {}", player.name, e);
                false
            }
        };

        let leaderboard = self
            .store
            .top_k(self.settings.leaderboard_size)
            .unwrap_or_else(|e| {
                log::error!("Could not load leaderboard: {}", e);
                Vec::new()
            });

        GameSummary {
            name: player.name.clone(),
            score: player.score,
            saved,
            leaderboard,
        }
    }

    fn draw_session(&mut self, session: &GameSession) -> io::Result<()> {
        let r = &mut self.platform;
        r.clear();

        let player = session.player();
        r.draw_rect(player.bounds(), player.color());
        for obstacle in session.obstacles() {
            r.draw_rect(obstacle.bounds(), obstacle.color());
        }

        r.draw_text(&format!("Score: {}", session.score()), 10.0, 10.0, Color::WHITE);
        r.draw_text(&format!("Time: {:.1}s", session.elapsed()), 10.0, 40.0, Color::WHITE);
        r.present()
    }

    fn draw_summary(&mut self, summary: &GameSummary) -> io::Result<()> {
        let arena = self.settings.arena();
        let (cx, cy) = (arena.center_x(), arena.center_y());
        let r = &mut self.platform;
        r.clear();

        let headline = if summary.saved {
            format!("Game Over! Your score: {}", summary.score)
        } else {
            format!("Game Over! Your score: {} (unsaved)", summary.score)
        };
        r.draw_text_centered(&headline, cx, cy - 50.0, Color::WHITE);

        let title = format!("Top {} Players:", self.settings.leaderboard_size);
        r.draw_text_centered(&title, cx, cy + 10.0, Color::WHITE);

        for (i, record) in summary.leaderboard.iter().enumerate() {
            let line = format!("{}. {}: {}", i + 1, record.name, record.score);
            r.draw_text_centered(&line, cx, cy + 50.0 + i as f32 * 30.0, Color::WHITE);
        }

        r.present()
    }
}
