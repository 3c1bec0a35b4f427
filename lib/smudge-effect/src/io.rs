use crate::{SmudgeEffectError, SmudgeEffectResult};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::{
    io::{BufWriter, Write},
    path::Path,
};

/// Decode an image file into a straight RGBA8 buffer.
pub fn load_image(path: impl AsRef<Path>) -> SmudgeEffectResult<RgbaImage> {
    let path = path.as_ref();
    let unreadable = |source: ImageError| SmudgeEffectError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unreadable(ImageError::IoError(e)))?
        .decode()
        .map_err(unreadable)?
        .to_rgba8();

    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Encode `image` next to `path` and move it into place once fully written.
///
/// The format follows the file extension and falls back to PNG.
pub fn save_image(image: &RgbaImage, path: impl AsRef<Path>) -> SmudgeEffectResult<()> {
    let path = path.as_ref();
    let unwritable = |source: ImageError| SmudgeEffectError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".smudge-")
        .tempfile_in(dir)
        .map_err(|e| unwritable(ImageError::IoError(e)))?;

    // JPEG has no alpha channel
    let encoded: DynamicImage = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image.clone()).to_rgb8().into(),
        _ => DynamicImage::ImageRgba8(image.clone()),
    };

    {
        let mut writer = BufWriter::new(&mut tmp);
        encoded.write_to(&mut writer, format).map_err(unwritable)?;
        writer
            .flush()
            .map_err(|e| unwritable(ImageError::IoError(e)))?;
    }

    tmp.persist(path)
        .map_err(|e| unwritable(ImageError::IoError(e.error)))?;

    log::info!("saved {} as {format:?}", path.display());
    Ok(())
}
