/// Full smudge pipeline example
/// Run `create_test_image` first to generate data/test.png

use smudge_effect::{CrackConfig, Effect, SmudgeEffect, SmudgePipeline, load_image, save_image};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img = load_image("data/test.png")?;
    let pipeline = SmudgePipeline::new().with_cracks(CrackConfig::new().with_seed(Some(30)));

    // Every stage on its own, on top of the previous ones
    let mut staged = img.clone();
    for (index, effect) in pipeline.effects().iter().enumerate() {
        effect.apply(&mut staged)?;

        let filename = format!("smudge_stage{}.png", index + 1);
        save_image(&staged, output_dir.join(&filename))?;
        println!("✓ {} -> {}", effect.name(), filename);
    }

    // Only the cracks, straight on the source
    let mut cracks_only = img.clone();
    SmudgeEffect::Cracks(CrackConfig::new().with_crack_count(120)).apply(&mut cracks_only)?;
    save_image(&cracks_only, output_dir.join("smudge_cracks_only.png"))?;
    println!("✓ Generated smudge_cracks_only.png");

    let output = pipeline.run(&img)?;
    save_image(&output, output_dir.join("smudge_full.png"))?;
    println!("\n✓ Smudge pipeline applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}
