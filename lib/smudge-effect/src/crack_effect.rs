use crate::{
    Color, Effect, SmudgeEffectError, SmudgeEffectResult, ensure_not_empty, surface::Surface,
};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f64::consts::{FRAC_PI_4, FRAC_PI_8, TAU};

/// Position, heading and remaining budget of one crack segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackState {
    pub position: (i32, i32),
    /// Radians
    pub heading: f64,
    pub length: i32,
    pub depth: u32,
}

impl CrackState {
    /// End of the segment, truncated toward zero to a pixel position.
    pub fn endpoint(&self) -> (i32, i32) {
        let dx = (self.heading.cos() * self.length as f64) as i32;
        let dy = (self.heading.sin() * self.length as f64) as i32;
        (
            self.position.0.saturating_add(dx),
            self.position.1.saturating_add(dy),
        )
    }
}

/// Randomly branching crack strokes
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CrackConfig {
    /// Number of independent crack trees
    #[derivative(Default(value = "50"))]
    pub crack_count: u32,

    /// Seed segment length range (inclusive)
    #[derivative(Default(value = "50"))]
    pub min_length: u32,

    #[derivative(Default(value = "100"))]
    pub max_length: u32,

    /// Branches stop spawning at this depth and anything deeper is discarded
    #[derivative(Default(value = "5"))]
    pub max_depth: u32,

    /// Chance for each of the left and right branches to spawn
    #[derivative(Default(value = "0.3"))]
    pub branch_probability: f64,

    /// Branches turn away by `[0, branch_spread)` radians
    #[derivative(Default(value = "FRAC_PI_4"))]
    pub branch_spread: f64,

    /// Continuations turn by `[-wobble / 2, wobble / 2)` radians
    #[derivative(Default(value = "FRAC_PI_8"))]
    pub wobble: f64,

    /// Continuations shorten by `[0, max_shrink)` pixels
    #[derivative(Default(value = "10"))]
    pub max_shrink: u32,

    #[derivative(Default(value = "Rgba([139, 0, 0, 200])"))]
    pub color: Color,

    /// Fixed seed for reproducible cracks, OS entropy otherwise
    pub seed: Option<u64>,
}

impl CrackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> SmudgeEffectResult<()> {
        if self.min_length > self.max_length {
            return Err(SmudgeEffectError::InvalidParameter(format!(
                "min_length {} is greater than max_length {}",
                self.min_length, self.max_length
            )));
        }

        if self.max_length > i32::MAX as u32 {
            return Err(SmudgeEffectError::InvalidParameter(format!(
                "max_length {} is too large",
                self.max_length
            )));
        }

        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(SmudgeEffectError::InvalidParameter(format!(
                "branch_probability {} is outside [0, 1]",
                self.branch_probability
            )));
        }

        if !self.branch_spread.is_finite() || self.branch_spread < 0.0 {
            return Err(SmudgeEffectError::InvalidParameter(
                "branch_spread must be a finite angle >= 0".to_string(),
            ));
        }

        if !self.wobble.is_finite() || self.wobble < 0.0 {
            return Err(SmudgeEffectError::InvalidParameter(
                "wobble must be a finite angle >= 0".to_string(),
            ));
        }

        if self.max_shrink > i32::MAX as u32 {
            return Err(SmudgeEffectError::InvalidParameter(format!(
                "max_shrink {} is too large",
                self.max_shrink
            )));
        }

        if self.max_shrink < 2 {
            return Err(SmudgeEffectError::InvalidParameter(
                "max_shrink must be >= 2 so cracks keep shortening".to_string(),
            ));
        }

        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Random start inside a `width x height` buffer.
    pub fn seed_state<R: Rng>(&self, width: u32, height: u32, rng: &mut R) -> CrackState {
        CrackState {
            position: (
                rng.random_range(0..width) as i32,
                rng.random_range(0..height) as i32,
            ),
            heading: rng.random::<f64>() * TAU,
            length: rng.random_range(self.min_length..=self.max_length) as i32,
            depth: 0,
        }
    }

    /// Draw `crack_count` crack trees, returning the number of segments drawn.
    pub fn generate<S, R>(&self, surface: &mut S, rng: &mut R) -> SmudgeEffectResult<usize>
    where
        S: Surface + ?Sized,
        R: Rng,
    {
        self.validate()?;

        let (width, height) = surface.dimensions();
        if width == 0 || height == 0 {
            return Ok(0);
        }

        let mut segments = 0;
        for _ in 0..self.crack_count {
            let seed = self.seed_state(width, height, rng);
            segments += self.grow(surface, rng, seed);
        }

        log::debug!(
            "drew {} cracks with {segments} segments on {width}x{height}",
            self.crack_count
        );

        Ok(segments)
    }

    /// Grow one crack tree from `seed`, returning the number of segments drawn.
    pub fn grow<S, R>(&self, surface: &mut S, rng: &mut R, seed: CrackState) -> usize
    where
        S: Surface + ?Sized,
        R: Rng,
    {
        self.grow_with(surface, rng, seed, |_, _| {})
    }

    fn grow_with<S, R, F>(
        &self,
        surface: &mut S,
        rng: &mut R,
        seed: CrackState,
        mut visit: F,
    ) -> usize
    where
        S: Surface + ?Sized,
        R: Rng,
        F: FnMut(&CrackState, (i32, i32)),
    {
        let (width, height) = surface.dimensions();
        let in_bounds =
            |(x, y): (i32, i32)| x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height;

        // LIFO: pushing continuation, right, left keeps the draw order left subtree,
        // right subtree, continuation.
        let mut stack = vec![seed];
        let mut drawn = 0;

        while let Some(state) = stack.pop() {
            if state.length <= 0 || state.depth > self.max_depth {
                continue;
            }

            let end = state.endpoint();
            if !in_bounds(end) {
                continue;
            }

            surface.stroke_segment(state.position, end, self.color);
            visit(&state, end);
            drawn += 1;

            let can_branch = state.depth < self.max_depth;
            let mut branch = |turn: f64| {
                (can_branch && rng.random_bool(self.branch_probability)).then(|| CrackState {
                    position: end,
                    heading: state.heading + turn * rng.random::<f64>() * self.branch_spread,
                    length: state.length / 2,
                    depth: state.depth + 1,
                })
            };
            let left = branch(1.0);
            let right = branch(-1.0);
            let next = CrackState {
                position: end,
                heading: state.heading + (rng.random::<f64>() - 0.5) * self.wobble,
                length: state.length - rng.random_range(0..self.max_shrink) as i32,
                depth: state.depth,
            };

            stack.push(next);
            stack.extend(right);
            stack.extend(left);
        }

        drawn
    }
}

impl Effect for CrackConfig {
    fn apply(&self, image: &mut RgbaImage) -> SmudgeEffectResult<()> {
        ensure_not_empty(image)?;
        let mut rng = self.rng();
        self.generate(image, &mut rng)?;
        Ok(())
    }
}
