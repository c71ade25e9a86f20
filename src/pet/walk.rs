use glam::Vec2;

/// Horizontal motion state. The pet only walks along the bottom of the screen.
#[derive(Debug, Clone)]
pub struct WalkState {
    /// Left edge of the host window, in `[0, screen_w - window_size]`.
    pub pos_x: f32,
    /// +1.0 = right, -1.0 = left.
    pub direction: f32,
    pub screen_w: u32,
    pub screen_h: u32,
    window_size: f32,
}

impl WalkState {
    pub fn new(screen_w: u32, screen_h: u32, window_size: f32) -> Self {
        Self {
            pos_x: 0.0,
            direction: 1.0,
            screen_w,
            screen_h,
            window_size,
        }
    }

    /// Rightmost valid window origin.
    pub fn max_x(&self) -> f32 {
        (self.screen_w as f32 - self.window_size).max(0.0)
    }

    pub fn set_screen(&mut self, screen_w: u32, screen_h: u32) {
        self.screen_w = screen_w;
        self.screen_h = screen_h;
        self.pos_x = self.pos_x.clamp(0.0, self.max_x());
    }

    /// Horizontally centered.
    pub fn center(&mut self) {
        self.pos_x = (self.screen_w as f32 / 2.0 - self.window_size / 2.0).clamp(0.0, self.max_x());
    }

    /// Uniform left/right.
    pub fn randomize_direction(&mut self, rng: &mut fastrand::Rng) {
        self.direction = if rng.bool() { 1.0 } else { -1.0 };
    }

    /// Advance one tick and bounce off the screen edges.
    pub fn step(&mut self, speed: f32) {
        self.pos_x += speed * self.direction;

        let max_x = self.max_x();
        if self.pos_x <= 0.0 {
            self.pos_x = 0.0;
            self.direction = 1.0;
        } else if self.pos_x >= max_x {
            self.pos_x = max_x;
            self.direction = -1.0;
        }
    }

    /// Window origin: walking along the bottom edge.
    pub fn window_origin(&self) -> Vec2 {
        Vec2::new(self.pos_x, self.screen_h as f32 - self.window_size)
    }
}
