/// Gamepad input adapter using gilrs.
///
/// D-pad presses and left-stick flicks produce one move each.
/// Restart and quit buttons come from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move
///   Start                 →  Restart
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
#[cfg(feature = "gamepad")]
use crate::domain::movement::Direction;
use super::input::Intent;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers for the configurable actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

fn parse_list(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    restart: Vec<Btn>,
    quit: Vec<Btn>,

    /// Stick direction currently past the deadzone, for edge detection.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick: (i8, i8),

    /// Intents produced by the most recent `update()`.
    pub intents: Vec<Intent>,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = Gilrs::new().ok();

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            restart: vec![Btn::Start],
            quit: vec![Btn::Select],
            stick: (0, 0),
            intents: Vec::with_capacity(4),
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() { self.restart = rs; }
        let qt = parse_list(&cfg.quit);
        if !qt.is_empty() { self.quit = qt; }
    }

    pub fn update(&mut self) {
        self.intents.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn button_intent(&self, btn: Btn) -> Option<Intent> {
        if self.quit.contains(&btn) {
            Some(Intent::Quit)
        } else if self.restart.contains(&btn) {
            Some(Intent::Restart)
        } else {
            None
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    let intent = match btn {
                        Button::DPadUp => Some(Intent::Move(Direction::Up)),
                        Button::DPadDown => Some(Intent::Move(Direction::Down)),
                        Button::DPadLeft => Some(Intent::Move(Direction::Left)),
                        Button::DPadRight => Some(Intent::Move(Direction::Right)),
                        other => Btn::from_gilrs(other).and_then(|b| self.button_intent(b)),
                    };
                    if let Some(i) = intent {
                        self.intents.push(i);
                    }
                }
                EventType::AxisChanged(axis, value, _) => self.update_axis(axis, value),
                EventType::Disconnected => self.stick = (0, 0),
                _ => {}
            }
        }
    }

    /// Fire a move when the stick crosses the deadzone on an axis.
    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        let digital = if value > STICK_DEADZONE {
            1
        } else if value < -STICK_DEADZONE {
            -1
        } else {
            0
        };
        match axis {
            Axis::LeftStickX => {
                if digital != 0 && digital != self.stick.0 {
                    let dir = if digital < 0 { Direction::Left } else { Direction::Right };
                    self.intents.push(Intent::Move(dir));
                }
                self.stick.0 = digital;
            }
            Axis::LeftStickY => {
                // gilrs reports up as positive
                if digital != 0 && digital != self.stick.1 {
                    let dir = if digital > 0 { Direction::Up } else { Direction::Down };
                    self.intents.push(Intent::Move(dir));
                }
                self.stick.1 = digital;
            }
            _ => {}
        }
    }
}
