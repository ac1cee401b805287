/// Keyboard input adapter.
///
/// Drains pending crossterm events once per frame and turns them into
/// `Intent`s. Every Press or Repeat of a movement key is one step, so
/// holding a key walks a corridor at the terminal's repeat rate.
/// Release events are ignored. Terminal resizes are reported separately.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::movement::Direction;

/// What the player asked for, independent of the device.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Move(Direction),
    Restart,
    Pause,
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map one key event to an intent. Unmapped keys yield None.
pub fn intent_for(key: &KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Intent::Quit);
    }
    let code = &key.code;
    if KEYS_UP.contains(code) {
        Some(Intent::Move(Direction::Up))
    } else if KEYS_DOWN.contains(code) {
        Some(Intent::Move(Direction::Down))
    } else if KEYS_LEFT.contains(code) {
        Some(Intent::Move(Direction::Left))
    } else if KEYS_RIGHT.contains(code) {
        Some(Intent::Move(Direction::Right))
    } else if KEYS_RESTART.contains(code) {
        Some(Intent::Restart)
    } else if KEYS_PAUSE.contains(code) {
        Some(Intent::Pause)
    } else if KEYS_QUIT.contains(code) {
        Some(Intent::Quit)
    } else {
        None
    }
}

pub struct InputState {
    /// Intents collected during the most recent drain, in arrival order.
    pub intents: Vec<Intent>,
    /// Latest terminal size reported this frame, if it changed.
    pub resized: Option<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            intents: Vec::with_capacity(8),
            resized: None,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.intents.clear();
        self.resized = None;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(intent) = intent_for(&key) {
                        self.intents.push(intent);
                    }
                }
                Ok(Event::Resize(w, h)) => self.resized = Some((w, h)),
                _ => {}
            }
        }
    }
}
