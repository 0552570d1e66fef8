//! Scripted platform doubles for unit tests

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use super::{FrameClock, HeldKeys, InputEvent, InputSource, Key, Renderer};
use crate::Color;
use crate::sim::Aabb;

/// Input for one `poll_events` call
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptFrame {
    pub events: Vec<InputEvent>,
    pub held: HeldKeys,
}

/// Plays back a fixed input script and records what was drawn
#[derive(Debug, Default)]
pub(crate) struct ScriptedPlatform {
    script: VecDeque<ScriptFrame>,
    held: HeldKeys,
    frame_texts: Vec<String>,
    frame_rects: usize,
    /// Text of every presented frame, in order
    pub presented: Vec<Vec<String>>,
    /// Rect count of every presented frame
    pub presented_rects: Vec<usize>,
}

impl ScriptedPlatform {
    pub fn new(script: Vec<ScriptFrame>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    /// Frames that type `name` and press Enter
    pub fn typing(name: &str) -> Vec<ScriptFrame> {
        let mut frames: Vec<ScriptFrame> = name
            .chars()
            .map(|c| ScriptFrame {
                events: vec![InputEvent::Key(Key::Char(c))],
                ..Default::default()
            })
            .collect();
        frames.push(ScriptFrame {
            events: vec![InputEvent::Key(Key::Enter)],
            ..Default::default()
        });
        frames
    }

    pub fn quit() -> ScriptFrame {
        ScriptFrame {
            events: vec![InputEvent::Quit],
            ..Default::default()
        }
    }

    pub fn last_frame(&self) -> &[String] {
        self.presented.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Renderer for ScriptedPlatform {
    fn clear(&mut self) {
        self.frame_texts.clear();
        self.frame_rects = 0;
    }

    fn draw_rect(&mut self, _rect: Aabb, _color: Color) {
        self.frame_rects += 1;
    }

    fn draw_text(&mut self, text: &str, _x: f32, _y: f32, _color: Color) {
        self.frame_texts.push(text.to_string());
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented.push(self.frame_texts.clone());
        self.presented_rects.push(self.frame_rects);
        Ok(())
    }
}

impl InputSource for ScriptedPlatform {
    fn poll_held_keys(&mut self) -> HeldKeys {
        self.held
    }

    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        match self.script.pop_front() {
            Some(frame) => {
                self.held = frame.held;
                Ok(frame.events)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Clock that never sleeps but counts what it was asked to do
#[derive(Debug, Default)]
pub(crate) struct NoopClock {
    pub frames: usize,
    pub paused: Duration,
}

impl FrameClock for NoopClock {
    fn wait_for_next_frame(&mut self) {
        self.frames += 1;
    }

    fn pause(&mut self, duration: Duration) {
        self.paused += duration;
    }
}
