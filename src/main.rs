/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::event::GameEvent;
use sim::progression::Status;
use sim::step;
use sim::world::WorldState;
use ui::confetti::Confetti;
use ui::gamepad::GamepadState;
use ui::input::{InputState, Intent};
use ui::renderer::{fit_grid, Renderer};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const MESSAGE_TICKS: u32 = 150;

fn main() {
    let config = GameConfig::load();

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(level) => {
            println!();
            println!("Thanks for playing Maze Run!");
            println!("Reached level: {level}");
        }
        Err(e) => eprintln!("Game error: {e}"),
    }
}

/// Runs until the player quits; returns the level they were on.
fn game_loop(
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<u32, Box<dyn std::error::Error>> {
    let (tw, th) = renderer.size()?;
    let mut world = WorldState::new(&config.maze, config.maze.size_for(fit_grid(tw, th)));
    let mut confetti = Confetti::new();
    let mut fx_rng = rand::thread_rng();

    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let win_delay = Duration::from_millis(config.speed.win_delay_ms);
    let mut last_tick = Instant::now();
    let mut win_at: Option<Instant> = None;

    announce_level(&mut world);

    loop {
        kb.drain_events();
        gp.update();

        if let Some((w, h)) = kb.resized {
            if config.maze.fits_terminal() {
                let events = world.resize(config.maze.size_for(fit_grid(w, h)));
                handle_events(&mut world, sound, &events, &mut win_at, win_delay);
            }
        }

        let intents: Vec<Intent> = kb.intents.iter().chain(&gp.intents).copied().collect();
        for intent in intents {
            let events = match intent {
                Intent::Quit => return Ok(world.progress.level),
                Intent::Pause => {
                    toggle_pause(&mut world);
                    continue;
                }
                Intent::Restart => {
                    confetti.stop();
                    win_at = None;
                    step::restart(&mut world)
                }
                Intent::Move(dir) => step::step(&mut world, Some(dir)),
            };
            handle_events(&mut world, sound, &events, &mut win_at, win_delay);
        }

        if last_tick.elapsed() >= tick_rate {
            if !world.paused {
                let events = world.tick_generation();
                handle_events(&mut world, sound, &events, &mut win_at, win_delay);
            }
            if confetti.is_active() {
                confetti.tick(&mut fx_rng);
            }

            if world.message_timer > 0 {
                world.message_timer -= 1;
                if world.message_timer == 0 { world.message.clear(); }
            }
            last_tick = Instant::now();
        }

        if win_at.map_or(false, |t| Instant::now() >= t) {
            win_at = None;
            if let Some(sfx) = sound {
                sfx.play_win();
            }
            let (w, h) = renderer.size()?;
            confetti.start(w, h, &mut fx_rng);
        }

        renderer.render(&world, &confetti)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn handle_events(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    events: &[GameEvent],
    win_at: &mut Option<Instant>,
    win_delay: Duration,
) {
    for event in events {
        match event {
            GameEvent::Bumped => {
                if let Some(sfx) = sound { sfx.play_bump(); }
            }
            GameEvent::LevelAdvanced { .. } => {
                if let Some(sfx) = sound { sfx.play_level_up(); }
                announce_level(world);
            }
            GameEvent::Restarted => announce_level(world),
            GameEvent::Won => {
                *win_at = Some(Instant::now() + win_delay);
                world.set_message("All mazes cleared!", MESSAGE_TICKS * 2);
            }
            GameEvent::MazeReady { .. } | GameEvent::Moved { .. } => {}
        }
    }
}

fn announce_level(world: &mut WorldState) {
    let msg = format!("Level {}", world.progress.level);
    world.set_message(&msg, MESSAGE_TICKS);
}

fn toggle_pause(world: &mut WorldState) {
    if world.progress.status == Status::Won {
        return;
    }
    world.paused = !world.paused;
    if world.paused {
        world.set_message("PAUSED  [P] Resume", 0);
    } else {
        world.message.clear();
        world.message_timer = 0;
    }
}
