//! Render one blended frame for a small demo portfolio and write it to a
//! PNG next to the working directory.
//!
//! Run with: `cargo run --example render_png`

use inkform::{TokenShare, VisualConfig, VisualController};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let font_path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/fonts/DejaVuSansMono.ttf"
    );

    let mut controller = VisualController::new(VisualConfig::default())?;
    controller.set_tokens(vec![
        TokenShare::new("SOL", 1000.0),
        TokenShare::new("DOGE", 500.0),
        TokenShare::new("BONK", 250.0),
    ]);
    controller.load_font(font_path);

    let frame = controller
        .tick()?
        .ok_or_else(|| anyhow::anyhow!("font did not load; nothing to draw"))?;

    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
        .ok_or_else(|| anyhow::anyhow!("frame buffer size mismatch"))?;
    let out = "inkform_blended.png";
    img.save(out)?;
    println!("wrote {out}");
    Ok(())
}
