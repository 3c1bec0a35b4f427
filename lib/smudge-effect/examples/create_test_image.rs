use image::{Rgba, RgbaImage};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("data");
    std::fs::create_dir_all(output_dir)?;

    // Night sky gradient with a row of warm street lights
    let (width, height) = (800u32, 600u32);
    let mut img = RgbaImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = (20 + y * 40 / height) as u8;
        let g = (24 + y * 50 / height) as u8;
        let b = (60 + (x + y) * 120 / (width + height)) as u8;
        *pixel = Rgba([r, g, b, 255]);
    }

    for lamp in 0..8 {
        let cx = 50 + lamp * 100;
        for y in 380..420 {
            for x in cx - 6..cx + 6 {
                img.put_pixel(x, y, Rgba([255, 214, 120, 255]));
            }
        }
    }

    let path = output_dir.join("test.png");
    img.save(&path)?;
    println!("Created {}", path.display());

    Ok(())
}
