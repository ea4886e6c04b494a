// Example runner for the `swing_vision` library: feeds a synthetic swing-setup
// sequence through a framing advisor and writes the final annotated frame next
// to the working directory.

use image::{Rgb, RgbImage};
use swing_vision::config::AdvisorConfig;
use swing_vision::core_modules::utils::image_helper::image_helper;
use swing_vision::pipeline::FramingAdvisor;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn backdrop() -> RgbImage {
    RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([96, 128, 96]))
}

fn frame_with_subject(center_x: u32) -> RgbImage {
    let mut frame = backdrop();
    let half_width = 64;
    let x0 = center_x.saturating_sub(half_width);
    let x1 = (center_x + half_width).min(WIDTH);
    for y in 40..460 {
        for x in x0..x1 {
            frame.put_pixel(x, y, Rgb([230, 210, 200]));
        }
    }
    frame
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut advisor = FramingAdvisor::new(AdvisorConfig::default())?;

    // Let the model learn the empty range first.
    for _ in 0..30 {
        advisor.process(&backdrop())?;
    }

    // A player walks in from the left and settles at center.
    let mut last = None;
    for center_x in [120u32, 200, 260, 320] {
        let verdict = advisor.process(&frame_with_subject(center_x))?;
        info!(
            ok = verdict.status.ok,
            subject = ?verdict.subject,
            "{}",
            verdict.status.message
        );
        last = Some(verdict);
    }

    if let Some(verdict) = last {
        let path = std::path::Path::new("framing_overlay.png");
        image_helper::save_png(path, verdict.overlay.image())?;
        info!(?path, "wrote final overlay");
    }

    Ok(())
}
