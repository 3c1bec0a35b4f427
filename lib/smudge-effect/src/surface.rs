//! Drawing targets shared by the overlay and crack passes.
//!
//! Effects talk to a [`Surface`] instead of a concrete buffer so the exact sequence of
//! draw calls can be observed with [`DrawLog`].

use crate::{Color, composite::source_over};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{Canvas, draw_line_segment_mut};

pub trait Surface {
    fn dimensions(&self) -> (u32, u32);

    /// Composite a filled disc centered at `center`. Pixels outside the surface are clipped.
    fn fill_disc(&mut self, center: (i32, i32), diameter: u32, color: Color);

    /// Composite a one pixel wide straight segment from `start` to `end` (both inclusive).
    fn stroke_segment(&mut self, start: (i32, i32), end: (i32, i32), color: Color);
}

/// Inclusive pixel bounds of the `diameter` wide box around `center`, clipped to
/// `width x height`. `None` when nothing of the box is visible.
fn clip_box(
    center: (i32, i32),
    diameter: u32,
    (width, height): (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    if diameter == 0 || width == 0 || height == 0 {
        return None;
    }

    let d = diameter as i64;
    let left = center.0 as i64 - d / 2;
    let top = center.1 as i64 - d / 2;
    let right = left + d - 1;
    let bottom = top + d - 1;

    if right < 0 || bottom < 0 || left >= width as i64 || top >= height as i64 {
        return None;
    }

    Some((
        left.max(0) as u32,
        top.max(0) as u32,
        right.min(width as i64 - 1) as u32,
        bottom.min(height as i64 - 1) as u32,
    ))
}

/// Canvas adapter that blends every plotted pixel instead of overwriting it.
struct CompositeCanvas<'a> {
    image: &'a mut RgbaImage,
}

impl Canvas for CompositeCanvas<'_> {
    type Pixel = Rgba<u8>;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        *self.image.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Self::Pixel) {
        let pixel = self.image.get_pixel_mut(x, y);
        *pixel = source_over(*pixel, color);
    }
}

impl Surface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn fill_disc(&mut self, center: (i32, i32), diameter: u32, color: Color) {
        // The disc fills the circle inscribed in the `diameter` wide box starting at
        // `center - diameter / 2`. Only the part of that box inside the image is visited.
        let Some((left, top, right, bottom)) = clip_box(center, diameter, self.dimensions())
        else {
            return;
        };

        let d = diameter as i64;
        let origin = (center.0 as i64 - d / 2, center.1 as i64 - d / 2);
        let radius = d as f64 / 2.0;
        let (cx, cy) = (origin.0 as f64 + radius, origin.1 as f64 + radius);

        for y in top..=bottom {
            let dy = y as f64 + 0.5 - cy;
            for x in left..=right {
                let dx = x as f64 + 0.5 - cx;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }

                let pixel = self.get_pixel_mut(x, y);
                *pixel = source_over(*pixel, color);
            }
        }
    }

    fn stroke_segment(&mut self, start: (i32, i32), end: (i32, i32), color: Color) {
        let mut canvas = CompositeCanvas { image: self };
        draw_line_segment_mut(
            &mut canvas,
            (start.0 as f32, start.1 as f32),
            (end.0 as f32, end.1 as f32),
            color,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    Disc {
        center: (i32, i32),
        diameter: u32,
        color: Color,
    },
    Segment {
        start: (i32, i32),
        end: (i32, i32),
        color: Color,
    },
}

/// Surface that records draw calls without rasterising anything.
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DrawLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: vec![],
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn discs(&self) -> impl Iterator<Item = (&(i32, i32), &Color)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Disc { center, color, .. } => Some((center, color)),
            DrawOp::Segment { .. } => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = (&(i32, i32), &(i32, i32))> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Segment { start, end, .. } => Some((start, end)),
            DrawOp::Disc { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for DrawLog {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_disc(&mut self, center: (i32, i32), diameter: u32, color: Color) {
        self.ops.push(DrawOp::Disc {
            center,
            diameter,
            color,
        });
    }

    fn stroke_segment(&mut self, start: (i32, i32), end: (i32, i32), color: Color) {
        self.ops.push(DrawOp::Segment { start, end, color });
    }
}
