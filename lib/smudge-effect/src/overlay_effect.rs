use crate::{
    Color, Effect, SmudgeEffectError, SmudgeEffectResult, composite::clamp_channel,
    ensure_not_empty, surface::Surface,
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, RgbaImage};

/// One translucent disc of the overlay grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disc {
    pub center: (u32, u32),
    pub color: Color,
}

/// Grid of translucent discs that darken and thicken row by row
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GridOverlayConfig {
    /// Distance between neighboring disc centers
    #[derivative(Default(value = "30"))]
    pub grid_step: u32,

    /// Disc diameter
    #[derivative(Default(value = "20"))]
    pub circle_size: u32,

    #[derivative(Default(value = "20"))]
    pub initial_alpha: u8,

    #[derivative(Default(value = "255"))]
    pub initial_red: u8,

    #[derivative(Default(value = "140"))]
    pub initial_green: u8,

    /// Blue never changes
    #[derivative(Default(value = "140"))]
    pub blue: u8,

    #[derivative(Default(value = "5"))]
    pub alpha_increment: u8,

    /// Applied to red and green
    #[derivative(Default(value = "5"))]
    pub color_decrement: u8,
}

impl GridOverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> SmudgeEffectResult<()> {
        if self.grid_step == 0 {
            return Err(SmudgeEffectError::InvalidParameter(
                "grid_step must be > 0".to_string(),
            ));
        }

        if self.circle_size == 0 {
            return Err(SmudgeEffectError::InvalidParameter(
                "circle_size must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn plan(&self, width: u32, height: u32) -> SmudgeEffectResult<GridCursor> {
        self.validate()?;
        Ok(GridCursor::new(self, width, height))
    }

    /// Paint every disc of the grid, returning how many were drawn.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) -> SmudgeEffectResult<usize> {
        let (width, height) = surface.dimensions();
        let mut count = 0;

        for disc in self.plan(width, height)? {
            surface.fill_disc(
                (disc.center.0 as i32, disc.center.1 as i32),
                self.circle_size,
                disc.color,
            );
            count += 1;
        }

        log::debug!(
            "painted {count} discs on {width}x{height} (step {}, diameter {})",
            self.grid_step,
            self.circle_size
        );

        Ok(count)
    }
}

impl Effect for GridOverlayConfig {
    fn apply(&self, image: &mut RgbaImage) -> SmudgeEffectResult<()> {
        ensure_not_empty(image)?;
        self.paint(image)?;
        Ok(())
    }
}

/// Walks the grid row by row, left to right, carrying the evolving disc color.
#[derive(Debug, Clone)]
pub struct GridCursor {
    width: u32,
    height: u32,
    step: u32,
    x: u32,
    y: u32,
    alpha: i32,
    red: i32,
    green: i32,
    blue: i32,
    initial_alpha: i32,
    initial_red: i32,
    initial_green: i32,
    alpha_increment: i32,
    color_decrement: i32,
}

impl GridCursor {
    fn new(config: &GridOverlayConfig, width: u32, height: u32) -> Self {
        let mut cursor = Self {
            width,
            height,
            step: config.grid_step,
            x: 0,
            y: 0,
            alpha: 0,
            red: 0,
            green: 0,
            blue: config.blue as i32,
            initial_alpha: config.initial_alpha as i32,
            initial_red: config.initial_red as i32,
            initial_green: config.initial_green as i32,
            alpha_increment: config.alpha_increment as i32,
            color_decrement: config.color_decrement as i32,
        };
        cursor.reset_row();
        cursor
    }

    /// Row `r = y / step` starts from the initial color shifted by `r` steps.
    fn reset_row(&mut self) {
        let row = (self.y / self.step) as i64;
        let alpha_shift = row * self.alpha_increment as i64;
        let color_shift = row * self.color_decrement as i64;

        self.alpha = (self.initial_alpha as i64 + alpha_shift).min(255) as i32;
        self.red = (self.initial_red as i64 - color_shift).max(0) as i32;
        self.green = (self.initial_green as i64 - color_shift).max(0) as i32;
    }

    fn advance_color(&mut self) {
        self.alpha = (self.alpha + self.alpha_increment).min(255);
        self.red = (self.red - self.color_decrement).max(0);
        self.green = (self.green - self.color_decrement).max(0);
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn color(&self) -> Color {
        Rgba([
            clamp_channel(self.red),
            clamp_channel(self.green),
            clamp_channel(self.blue),
            clamp_channel(self.alpha),
        ])
    }
}

impl Iterator for GridCursor {
    type Item = Disc;

    fn next(&mut self) -> Option<Disc> {
        if self.y >= self.height {
            return None;
        }

        if self.x >= self.width {
            self.x = 0;
            self.y = self.y.saturating_add(self.step);
            if self.y >= self.height {
                return None;
            }
            self.reset_row();
        }

        let disc = Disc {
            center: (self.x, self.y),
            color: self.color(),
        };

        self.x = self.x.saturating_add(self.step);
        self.advance_color();

        Some(disc)
    }
}
