//! Dodger entry point
//!
//! Loads settings, opens the score store and runs one game in the terminal.

use std::process::ExitCode;

use dodger::platform::{SleepClock, TerminalPlatform};
use dodger::{
    GameController, GameError, JsonlScoreStore, RunOutcome, ScoreStore, Settings,
    UnavailableScoreStore,
};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Dodger starting...");

    let settings = Settings::load();

    match run_game(settings) {
        Ok(RunOutcome::Completed(summary)) => {
            log::info!("{} finished with score {}", summary.name, summary.score);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Aborted) => {
            log::info!("Game aborted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs one game. The terminal is restored when this returns.
fn run_game(settings: Settings) -> Result<RunOutcome, GameError> {
    let store: Box<dyn ScoreStore> = match JsonlScoreStore::open(&settings.scores_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; scores will not persist this run", e);
            Box::new(UnavailableScoreStore::new(&settings.scores_path, e.to_string()))
        }
    };

    let platform = TerminalPlatform::new(settings.arena())?;
    let clock = SleepClock::new(settings.frame_duration());
    GameController::new(platform, store, clock, settings).run()
}
