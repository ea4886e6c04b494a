// THEORY:
// The `BackgroundModel` is the heart of the temporal analysis layer. It is a
// stateful, learning entity that observes the stream of frames for one camera
// feed and decides, pixel by pixel, whether the current value is "background"
// (consistent with what this location has looked like recently) or "foreground"
// (a statistical outlier, i.e. the subject).
//
// Key architectural principles:
// 1.  **Per-Pixel Memory**: Every pixel location owns a running Gaussian (an RGB
//     mean plus a scalar variance) learned over a sliding history window. The
//     learning rate is 1/min(frames_seen, history_length), so early frames adapt
//     fast and the model settles into a rolling average of the last
//     `history_length` frames.
// 2.  **Adaptive Thresholding**: A pixel is foreground when its squared distance
//     from the mean exceeds `variance_threshold` times the learned variance. A
//     noisy camera widens its own tolerance; a quiet one tightens it.
// 3.  **Shadow Exclusion**: A cast shadow is the learned background dimmed by a
//     roughly uniform factor. Candidate foreground pixels that fit that profile
//     are folded back into the background so a player's shadow on the turf does
//     not stretch the subject's bounding box.
// 4.  **Order Dependence**: The model is only meaningful over frames delivered in
//     arrival order, and is owned by exactly one advisor. It is never shared
//     across streams.

use crate::core_modules::pixel::pixel::{Intensity, MeanColor, Pixel};
use crate::core_modules::mask::ForegroundMask;
use image::RgbImage;
use tracing::{debug, warn};

// Variance bootstrap and clamps, on the summed-over-channels distance scale.
const INITIAL_VARIANCE: Intensity = 225.0;
const MIN_VARIANCE: Intensity = 4.0;
const MAX_VARIANCE: Intensity = 5.0 * INITIAL_VARIANCE;
// A candidate dimmer than half the learned background is an object, not a shadow.
const SHADOW_RATIO_FLOOR: Intensity = 0.5;

/// The running Gaussian for a single pixel location.
#[derive(Debug, Clone, Copy)]
struct PixelModel {
    mean: MeanColor,
    variance: Intensity,
}

/// A per-stream adaptive background model producing binary foreground masks.
pub struct BackgroundModel {
    /// Number of frames the running statistics effectively average over.
    history_length: u32,
    /// Multiplier on the learned variance that sets the foreground boundary.
    variance_threshold: Intensity,
    /// Whether shadow-like pixels are folded back into the background.
    suppress_shadows: bool,
    /// Dimensions the model is currently shaped for.
    width: u32,
    height: u32,
    /// Frames absorbed since the last (re)seed.
    frames_seen: u32,
    /// One running Gaussian per pixel, row-major.
    models: Vec<PixelModel>,
}

impl BackgroundModel {
    pub fn new(history_length: u32, variance_threshold: Intensity, suppress_shadows: bool) -> Self {
        Self {
            history_length: history_length.max(1),
            variance_threshold,
            suppress_shadows,
            width: 0,
            height: 0,
            frames_seen: 0,
            models: Vec::new(),
        }
    }

    /// Absorbs one frame and returns its foreground mask. The first frame after
    /// construction (or after a resolution change) seeds the model and yields an
    /// all-background mask; "no subject yet" is the expected starting state.
    pub fn apply(&mut self, frame: &RgbImage) -> ForegroundMask {
        let (width, height) = frame.dimensions();
        if width != self.width || height != self.height {
            if !self.models.is_empty() {
                warn!(
                    old_width = self.width,
                    old_height = self.height,
                    width,
                    height,
                    "frame size changed; resetting background model"
                );
            }
            self.reshape(width, height);
        }

        let mut mask = ForegroundMask::new(width, height);

        if self.frames_seen == 0 {
            for (index, raw) in frame.pixels().enumerate() {
                self.models[index] = PixelModel {
                    mean: Pixel::from(*raw).channels(),
                    variance: INITIAL_VARIANCE,
                };
            }
            self.frames_seen = 1;
            debug!(width, height, "background model seeded from first frame");
            return mask;
        }

        // frames_seen counts the seed frame, so the current frame is number
        // frames_seen + 1; its weight follows a plain running average until the
        // window fills, then holds at 1/history_length.
        let learning_rate =
            1.0 / self.frames_seen.saturating_add(1).min(self.history_length) as Intensity;

        for (index, raw) in frame.pixels().enumerate() {
            let pixel = Pixel::from(*raw);
            let model = &mut self.models[index];

            let distance = pixel.distance_squared(&model.mean);
            let threshold = self.variance_threshold * model.variance;
            let mut foreground = distance > threshold;

            if foreground && self.suppress_shadows {
                if let Some(ratio) = pixel.brightness_ratio(&model.mean) {
                    if (SHADOW_RATIO_FLOOR..1.0).contains(&ratio)
                        && pixel.distortion_squared(&model.mean, ratio) <= threshold
                    {
                        foreground = false;
                    }
                }
            }

            if foreground {
                mask.set_index(index, true);
            }

            let channels = pixel.channels();
            for c in 0..3 {
                model.mean[c] += learning_rate * (channels[c] - model.mean[c]);
            }
            model.variance = (model.variance + learning_rate * (distance - model.variance))
                .clamp(MIN_VARIANCE, MAX_VARIANCE);
        }

        self.frames_seen = self.frames_seen.saturating_add(1);
        mask
    }

    /// Discards everything learned; the next frame reseeds the model.
    pub fn reset(&mut self) {
        self.frames_seen = 0;
        for model in &mut self.models {
            model.mean = [0.0; 3];
            model.variance = INITIAL_VARIANCE;
        }
    }

    fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.frames_seen = 0;
        self.models = vec![
            PixelModel {
                mean: [0.0; 3],
                variance: INITIAL_VARIANCE,
            };
            (width as usize) * (height as usize)
        ];
    }
}
