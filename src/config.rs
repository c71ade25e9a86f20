use std::time::Duration;

use clap::Parser;

/// Command line flags.
#[derive(Debug, Parser)]
#[command(name = "chill-pet", version, about = "Chill the Ice Slime, a desktop companion")]
pub struct Args {
    /// Seed the behavior RNG for a reproducible session.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pin the local hour (0-23) instead of reading the system clock.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,

    /// Walking speed in logical pixels per tick.
    #[arg(long, default_value_t = 1.5, value_parser = parse_speed)]
    pub walk_speed: f32,
}

/// Walking speed must be a finite, positive step or the pet leaves the screen.
fn parse_speed(s: &str) -> Result<f32, String> {
    let speed: f32 = s.parse().map_err(|e| format!("invalid speed '{s}': {e}"))?;
    if !speed.is_finite() || speed <= 0.0 {
        return Err(format!("speed must be a positive number, got {s}"));
    }
    Ok(speed)
}

/// Geometry and motion tuning for one pet.
#[derive(Debug, Clone)]
pub struct PetConfig {
    /// Host window edge length (square, logical pixels).
    pub window_size: f32,
    pub sprite_size: f32,
    /// Transparent margin around the sprite inside the window.
    pub sprite_padding: f32,
    /// Pixels per walk tick.
    pub walk_speed: f32,
    pub walk_tick: Duration,
    /// Used until (or instead of) the host reporting screen geometry.
    pub fallback_screen: (u32, u32),
    pub seed: Option<u64>,
    pub pinned_hour: Option<u32>,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            window_size: 200.0,
            sprite_size: 128.0,
            sprite_padding: 36.0,
            walk_speed: 1.5,
            walk_tick: Duration::from_millis(50),
            fallback_screen: (1920, 1080),
            seed: None,
            pinned_hour: None,
        }
    }
}

impl PetConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            walk_speed: args.walk_speed,
            seed: args.seed,
            pinned_hour: args.hour,
            ..Self::default()
        }
    }

    /// Sprite hit area inside the window: (min, max) on both axes.
    pub fn hit_area(&self) -> (f32, f32) {
        (self.sprite_padding, self.sprite_padding + self.sprite_size)
    }
}
