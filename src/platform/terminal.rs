//! Terminal frontend on top of crossterm
//!
//! The arena is scaled onto the terminal grid: every cell covers
//! `arena.width / cols` by `arena.height / rows` units. Boxes become runs of
//! colored cells, text is written cell by cell. Frames are built in a back
//! buffer and written in one batched flush.
//!
//! Terminals do not report key releases unless they support the keyboard
//! enhancement protocol, so on plain terminals a direction counts as held
//! while presses/auto-repeats keep arriving within `HOLD_WINDOW`.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use super::{HeldKeys, InputEvent, InputSource, Key, Renderer};
use crate::Color;
use crate::sim::{Aabb, Arena};

/// How long a direction stays held after its last press/repeat
const HOLD_WINDOW: Duration = Duration::from_millis(150);

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

// === Cell grid: the back buffer ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::WHITE,
        bg: Color::BLACK,
    };
}

#[derive(Debug)]
struct CellGrid {
    arena: Arena,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl CellGrid {
    fn new(arena: Arena, cols: u16, rows: u16) -> Self {
        let mut grid = Self {
            arena,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        grid.resize(cols, rows);
        grid
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::BLANK; self.cols as usize * self.rows as usize];
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn units_per_col(&self) -> f32 {
        self.arena.width / f32::from(self.cols)
    }

    fn units_per_row(&self) -> f32 {
        self.arena.height / f32::from(self.rows)
    }

    fn col_of(&self, x: f32) -> i32 {
        (x / self.units_per_col()).floor() as i32
    }

    fn row_of(&self, y: f32) -> i32 {
        (y / self.units_per_row()).floor() as i32
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        let (min, max) = (rect.min(), rect.max());
        let col0 = self.col_of(min.x);
        let row0 = self.row_of(min.y);
        // Every box covers at least one cell
        let col1 = ((max.x / self.units_per_col()).ceil() as i32).max(col0 + 1);
        let row1 = ((max.y / self.units_per_row()).ceil() as i32).max(row0 + 1);

        for row in row0..row1 {
            for col in col0..col1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell {
                        ch: ' ',
                        fg: color,
                        bg: color,
                    };
                }
            }
        }
    }

    fn put_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        let row = self.row_of(y);
        let col0 = self.col_of(x);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col0 + i as i32, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let mut current: Option<(Color, Color)> = None;
        for row in 0..self.rows {
            queue!(out, MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if current != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(term_color(cell.fg)),
                        SetBackgroundColor(term_color(cell.bg))
                    )?;
                    current = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

// === Keyboard: events and held directions ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Direction {
    fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct KeyboardState {
    /// Terminal reports releases; held state is exact
    release_events: bool,
    last_seen: [Option<Instant>; 4],
}

impl KeyboardState {
    fn new(release_events: bool) -> Self {
        Self {
            release_events,
            last_seen: [None; 4],
        }
    }

    /// Track held directions and translate a key event into an input event
    fn translate(&mut self, key: KeyEvent, now: Instant) -> Option<InputEvent> {
        if let Some(dir) = Direction::from_code(key.code) {
            self.last_seen[dir as usize] = match key.kind {
                KeyEventKind::Release => None,
                KeyEventKind::Press | KeyEventKind::Repeat => Some(now),
            };
        }

        if key.kind == KeyEventKind::Release {
            return None;
        }

        let quit = key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            return Some(InputEvent::Quit);
        }

        let mapped = match key.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            _ => return None,
        };
        Some(InputEvent::Key(mapped))
    }

    fn is_held(&self, dir: Direction, now: Instant) -> bool {
        match self.last_seen[dir as usize] {
            Some(seen) => self.release_events || now.duration_since(seen) <= HOLD_WINDOW,
            None => false,
        }
    }

    fn held(&self, now: Instant) -> HeldKeys {
        HeldKeys {
            left: self.is_held(Direction::Left, now),
            right: self.is_held(Direction::Right, now),
            up: self.is_held(Direction::Up, now),
            down: self.is_held(Direction::Down, now),
        }
    }
}

// === Platform ===

/// Raw-mode alternate-screen terminal. Restores the terminal on drop.
pub struct TerminalPlatform {
    out: Stdout,
    grid: CellGrid,
    keyboard: KeyboardState,
    enhanced: bool,
}

impl TerminalPlatform {
    pub fn new(arena: Arena) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;

        // From here on, Drop undoes whatever was set up
        let mut platform = Self {
            out: io::stdout(),
            grid: CellGrid::new(arena, cols, rows),
            keyboard: KeyboardState::new(false),
            enhanced: false,
        };

        execute!(
            platform.out,
            EnterAlternateScreen,
            Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                platform.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            platform.enhanced = true;
            platform.keyboard = KeyboardState::new(true);
        }

        log::info!(
            "Terminal {}x{} (key release events: {})",
            cols,
            rows,
            platform.enhanced
        );
        Ok(platform)
    }
}

impl Drop for TerminalPlatform {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.out, ResetColor, LeaveAlternateScreen, Show, EnableLineWrap);
        let _ = terminal::disable_raw_mode();
    }
}

impl Renderer for TerminalPlatform {
    fn clear(&mut self) {
        self.grid.clear();
    }

    fn draw_rect(&mut self, rect: Aabb, color: Color) {
        self.grid.fill_rect(rect, color);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        self.grid.put_text(text, x, y, color);
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.grid.units_per_col()
    }

    fn present(&mut self) -> io::Result<()> {
        let mut out = self.out.lock();
        self.grid.write_to(&mut out)
    }
}

impl InputSource for TerminalPlatform {
    fn poll_held_keys(&mut self) -> HeldKeys {
        self.keyboard.held(Instant::now())
    }

    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(ev) = self.keyboard.translate(key, Instant::now()) {
                        events.push(ev);
                    }
                }
                Event::Resize(cols, rows) => {
                    self.grid.resize(cols, rows);
                    execute!(self.out, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }
        Ok(events)
    }
}
