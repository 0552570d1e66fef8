//! Platform abstraction layer
//!
//! The game core only talks to these traits:
//! - `Renderer`: draw boxes and text in arena coordinates
//! - `InputSource`: held direction keys and discrete key/quit events
//! - `FrameClock`: fixed-rate pacing and the end-of-run pause
//!
//! `terminal` implements the first two on top of crossterm.

pub mod name_entry;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use name_entry::NameEntry;
pub use terminal::TerminalPlatform;

use std::io;
use std::time::{Duration, Instant};

use crate::Color;
use crate::sim::{Aabb, TickInput};

/// A discrete key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

/// Events reported since the previous poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close / abort request
    Quit,
    Key(Key),
}

/// Direction keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl From<HeldKeys> for TickInput {
    fn from(keys: HeldKeys) -> Self {
        TickInput {
            left: keys.left,
            right: keys.right,
            up: keys.up,
            down: keys.down,
        }
    }
}

/// Drawing surface addressed in arena coordinates
pub trait Renderer {
    /// Fill the whole surface with the background color
    fn clear(&mut self);

    fn draw_rect(&mut self, rect: Aabb, color: Color);

    /// Draw `text` with its top-left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);

    /// Width `text` would occupy, in arena units
    fn text_width(&self, text: &str) -> f32;

    /// Show everything drawn since the last `clear`
    fn present(&mut self) -> io::Result<()>;

    /// Draw `text` horizontally centered on `center_x`
    fn draw_text_centered(&mut self, text: &str, center_x: f32, y: f32, color: Color) {
        let x = center_x - self.text_width(text) / 2.0;
        self.draw_text(text, x, y, color);
    }
}

/// Keyboard/window input, sampled once per frame
pub trait InputSource {
    /// Direction keys held right now
    fn poll_held_keys(&mut self) -> HeldKeys;

    /// Everything that happened since the last call
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// Frame pacing
pub trait FrameClock {
    /// Block until the next frame is due
    fn wait_for_next_frame(&mut self);

    /// Block for a fixed real-time span
    fn pause(&mut self, duration: Duration);
}

/// Sleeps away whatever is left of each frame's budget
#[derive(Debug)]
pub struct SleepClock {
    frame: Duration,
    frame_start: Instant,
}

impl SleepClock {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            frame_start: Instant::now(),
        }
    }
}

impl FrameClock for SleepClock {
    fn wait_for_next_frame(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if let Some(remaining) = self.frame.checked_sub(elapsed) {
            std::thread::sleep(remaining);
        }
        self.frame_start = Instant::now();
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
        self.frame_start = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_map_to_tick_input() {
        let keys = HeldKeys {
            left: true,
            down: true,
            ..Default::default()
        };
        let input = TickInput::from(keys);
        assert!(input.left && input.down);
        assert!(!input.right && !input.up);
    }

    #[test]
    fn test_sleep_clock_paces_frames() {
        let mut clock = SleepClock::new(Duration::from_millis(5));
        let start = Instant::now();
        for _ in 0..4 {
            clock.wait_for_next_frame();
        }
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
