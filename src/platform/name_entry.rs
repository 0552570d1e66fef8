//! Player name prompt
//!
//! Runs its own small loop over the platform until the player submits a
//! non-empty name or asks to quit.

use std::io;

use super::{FrameClock, InputEvent, InputSource, Key, Renderer};
use crate::Color;
use crate::sim::Arena;

const PROMPT: &str = "Enter your name:";

/// Line editor for the player's name
#[derive(Debug, Clone)]
pub struct NameEntry {
    buffer: String,
    max_len: usize,
}

impl NameEntry {
    /// Editor accepting at most `max_len` code points
    pub fn new(max_len: usize) -> Self {
        Self {
            buffer: String::new(),
            max_len,
        }
    }

    /// Text typed so far
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Apply one key; returns the finished name when Enter submits it.
    ///
    /// Enter on an empty buffer and characters past the cap are ignored.
    pub fn handle_key(&mut self, key: Key) -> Option<String> {
        match key {
            Key::Enter if !self.buffer.is_empty() => return Some(self.buffer.clone()),
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Char(c) if !c.is_control() && self.buffer.chars().count() < self.max_len => {
                self.buffer.push(c);
            }
            _ => {}
        }
        None
    }

    /// Prompt until a name is submitted. `Ok(None)` means the player quit.
    pub fn run<P, C>(
        mut self,
        platform: &mut P,
        clock: &mut C,
        arena: &Arena,
    ) -> io::Result<Option<String>>
    where
        P: Renderer + InputSource,
        C: FrameClock,
    {
        loop {
            for event in platform.poll_events()? {
                match event {
                    InputEvent::Quit => return Ok(None),
                    InputEvent::Key(key) => {
                        if let Some(name) = self.handle_key(key) {
                            log::info!("Player name entered: {:?}", name);
                            return Ok(Some(name));
                        }
                    }
                }
            }

            self.draw(platform, arena)?;
            clock.wait_for_next_frame();
        }
    }

    fn draw<R: Renderer>(&self, renderer: &mut R, arena: &Arena) -> io::Result<()> {
        let cx = arena.center_x();
        let cy = arena.center_y();
        renderer.clear();
        renderer.draw_text_centered(PROMPT, cx, cy - 50.0, Color::WHITE);
        renderer.draw_text_centered(&self.buffer, cx, cy, Color::WHITE);
        renderer.present()
    }
}
