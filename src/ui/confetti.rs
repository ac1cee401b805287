/// Confetti overlay for the final win.
///
/// A fixed field of particles drifts down the screen; each loses a little
/// opacity per frame and, once faded, reappears at a random column on the
/// top row. The field runs until `stop()`; nothing in the game reads it.

use rand::Rng;

pub const PARTICLE_COUNT: usize = 200;

/// Terminal cells are much coarser than pixels; slow the drift to match.
const SPEED_SCALE: f32 = 0.25;
const FADE_PER_FRAME: f32 = 0.01;

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// 2..7, picks the glyph.
    pub size: f32,
    pub rgb: (u8, u8, u8),
    pub speed_x: f32,
    pub speed_y: f32,
    pub opacity: f32,
}

impl Particle {
    pub fn glyph(&self) -> char {
        match self.size as u32 {
            0..=2 => '·',
            3..=4 => '•',
            _ => '●',
        }
    }
}

#[derive(Default)]
pub struct Confetti {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl Confetti {
    pub fn new() -> Self {
        Confetti::default()
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Scatter a fresh field over a `width`×`height` screen.
    pub fn start<R: Rng + ?Sized>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.gen::<f32>() * self.width,
                y: rng.gen::<f32>() * self.height,
                size: rng.gen::<f32>() * 5.0 + 2.0,
                rgb: hue_to_rgb(rng.gen::<f32>() * 360.0),
                speed_x: (rng.gen::<f32>() * 4.0 - 2.0) * SPEED_SCALE,
                speed_y: (rng.gen::<f32>() * 4.0 + 2.0) * SPEED_SCALE,
                opacity: 1.0,
            })
            .collect();
    }

    pub fn stop(&mut self) {
        self.particles.clear();
    }

    /// Advance one animation frame.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;
            p.opacity -= FADE_PER_FRAME;
            if p.opacity <= 0.0 {
                p.opacity = 1.0;
                p.x = rng.gen::<f32>() * self.width;
                p.y = 0.0;
            }
        }
    }
}

/// HSL with full saturation and 50% lightness.
fn hue_to_rgb(hue: f32) -> (u8, u8, u8) {
    let h = (hue % 360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
