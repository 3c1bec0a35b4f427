use crate::Color;
use image::Rgba;

/// Clamp an intermediate channel value into the 8-bit range.
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn unit_to_channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Straight-alpha source-over: paints `src` on top of `dst`.
pub fn source_over(dst: Color, src: Color) -> Color {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = src[i] as f32 / 255.0;
        let dc = dst[i] as f32 / 255.0;
        out[i] = unit_to_channel((sc * sa + dc * da * (1.0 - sa)) / out_a);
    }
    out[3] = unit_to_channel(out_a);

    Rgba(out)
}
