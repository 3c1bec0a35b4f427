// cargo test -p smudge-effect --test smudge_test

use image::{Rgba, RgbaImage};
use rand::{SeedableRng, rngs::StdRng};
use smudge_effect::{
    ConvolutionBlurConfig, CrackConfig, DrawLog, DrawOp, Effect, GridOverlayConfig,
    SmudgeEffectError, SmudgePipeline, load_image, save_image,
};

const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_blur_uniform_round_trip() {
    init_logger();

    for px in [
        GRAY,
        Rgba([0, 0, 0, 0]),
        Rgba([255, 255, 255, 255]),
        Rgba([3, 250, 17, 99]),
    ] {
        let src = RgbaImage::from_pixel(31, 19, px);
        let out = ConvolutionBlurConfig::new().blur(&src).unwrap();
        assert_eq!(out, src);
    }
}

#[test]
fn test_overlay_determinism() {
    init_logger();
    let config = GridOverlayConfig::new();

    let mut first = DrawLog::new(211, 157);
    let mut second = DrawLog::new(211, 157);
    config.paint(&mut first).unwrap();
    config.paint(&mut second).unwrap();
    assert_eq!(first.ops(), second.ops());

    let mut a = RgbaImage::new(211, 157);
    let mut b = RgbaImage::new(211, 157);
    config.apply(&mut a).unwrap();
    config.apply(&mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_overlay_row_reset() {
    let discs: Vec<_> = GridOverlayConfig::new().plan(60, 90).unwrap().collect();
    let row1 = discs.iter().find(|d| d.center == (0, 30)).unwrap();
    let row2 = discs.iter().find(|d| d.center == (0, 60)).unwrap();

    assert!(row2.color[3] > row1.color[3]);
    assert!(row2.color[0] < row1.color[0]);
    assert!(row2.color[1] < row1.color[1]);
    assert_eq!(row2.color, Rgba([245, 130, 140, 30]));
}

#[test]
fn test_clamping_on_adversarial_overlay() {
    let config = GridOverlayConfig::new().with_grid_step(3).with_circle_size(4);
    let mut image = RgbaImage::from_pixel(300, 600, GRAY);
    config.apply(&mut image).unwrap();

    let discs: Vec<_> = config.plan(300, 600).unwrap().collect();
    let last = discs.last().unwrap();
    assert_eq!(last.center, (297, 597));
    assert_eq!(last.color, Rgba([0, 0, 140, 255]));

    // fully opaque discs leave their own color behind
    assert_eq!(*image.get_pixel(297, 597), Rgba([0, 0, 140, 255]));
}

#[test]
fn test_huge_circle_size_is_clipped() {
    let config = GridOverlayConfig::new()
        .with_grid_step(100)
        .with_circle_size(u32::MAX);
    let mut image = RgbaImage::from_pixel(50, 50, GRAY);
    config.apply(&mut image).unwrap();

    // the single disc at the origin covers every pixel once
    let expected = smudge_effect::composite::source_over(GRAY, Rgba([255, 140, 140, 20]));
    assert!(image.pixels().all(|p| *p == expected));
}

#[test]
fn test_crack_termination_across_seeds() {
    let config = CrackConfig::new().with_crack_count(1);
    let mut log = DrawLog::new(160, 120);

    for seed in 0..10_000u64 {
        log.clear();
        let mut rng = StdRng::seed_from_u64(seed);
        let drawn = config.generate(&mut log, &mut rng).unwrap();
        assert_eq!(drawn, log.ops().len());
    }
}

#[test]
fn test_crack_segments_stay_in_bounds() {
    let (width, height) = (240u32, 130u32);
    let config = CrackConfig::new().with_crack_count(400).with_branch_probability(0.6);
    let mut log = DrawLog::new(width, height);
    let mut rng = StdRng::seed_from_u64(2024);

    let drawn = config.generate(&mut log, &mut rng).unwrap();
    assert!(drawn > 0);

    let inside =
        |(x, y): (i32, i32)| (0..width as i32).contains(&x) && (0..height as i32).contains(&y);
    for op in log.ops() {
        match *op {
            DrawOp::Segment { start, end, color } => {
                assert!(inside(start), "start {start:?} outside");
                assert!(inside(end), "end {end:?} outside");
                assert_eq!(color, Rgba([139, 0, 0, 200]));
            }
            DrawOp::Disc { .. } => panic!("cracks never draw discs"),
        }
    }
}

#[test]
fn test_end_to_end_scenario() {
    init_logger();
    let input = RgbaImage::from_pixel(100, 100, GRAY);
    let pipeline = SmudgePipeline::from_knobs(7, 30, 20, 0, None).unwrap();

    // (a) uniform input survives the blur unchanged
    let blurred = pipeline.blur.blur(&input).unwrap();
    assert_eq!(blurred, input);

    // (b) 4x4 discs at the grid points with the documented colors
    let mut log = DrawLog::new(100, 100);
    assert_eq!(pipeline.overlay.paint(&mut log).unwrap(), 16);

    let centers: Vec<_> = log.discs().map(|(c, _)| *c).collect();
    let expected: Vec<_> = (0..4)
        .flat_map(|row| (0..4).map(move |col| (col * 30, row * 30)))
        .collect();
    assert_eq!(centers, expected);

    let colors: Vec<_> = log.discs().map(|(_, c)| *c).collect();
    assert_eq!(colors[0], Rgba([255, 140, 140, 20]));
    assert_eq!(colors[3], Rgba([240, 125, 140, 35]));

    // no cracks: the full run equals blur followed by the overlay
    let mut expected_image = blurred.clone();
    pipeline.overlay.apply(&mut expected_image).unwrap();
    let output = pipeline.run(&input).unwrap();
    assert_eq!(output, expected_image);
    assert_ne!(output, input);
}

#[test]
fn test_seeded_pipeline_is_reproducible() {
    let input = RgbaImage::from_pixel(120, 90, Rgba([40, 60, 90, 255]));
    let pipeline = SmudgePipeline::from_knobs(7, 30, 20, 50, Some(7)).unwrap();

    assert_eq!(pipeline.run(&input).unwrap(), pipeline.run(&input).unwrap());
}

#[test]
fn test_png_save_and_load() -> anyhow::Result<()> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("smudged.png");

    let mut image = RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 200]));
    image.put_pixel(5, 5, Rgba([250, 0, 0, 255]));

    save_image(&image, &path)?;
    let loaded = load_image(&path)?;
    assert_eq!(loaded, image);

    let leftovers = std::fs::read_dir(dir.path())?.count();
    assert_eq!(leftovers, 1);
    Ok(())
}

#[test]
fn test_jpeg_output_drops_alpha() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("smudged.jpg");

    save_image(&RgbaImage::from_pixel(16, 16, GRAY), &path)?;
    let loaded = load_image(&path)?;
    assert_eq!(loaded.dimensions(), (16, 16));
    assert!(loaded.pixels().all(|p| p[3] == 255));
    Ok(())
}

#[test]
fn test_missing_input_is_unreadable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.png");

    match load_image(&path) {
        Err(SmudgeEffectError::InputUnreadable { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_garbage_input_is_unreadable() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"definitely not a png")?;

    assert!(matches!(
        load_image(&path),
        Err(SmudgeEffectError::InputUnreadable { .. })
    ));
    Ok(())
}

#[test]
fn test_unwritable_output_leaves_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("no-such-dir").join("out.png");

    assert!(matches!(
        save_image(&RgbaImage::new(4, 4), &path),
        Err(SmudgeEffectError::OutputUnwritable { .. })
    ));
    assert!(!path.exists());
    Ok(())
}
