// THEORY:
// The `pipeline` module is the top-level API for the framing engine. It
// encapsulates the full stack (per-pixel background learning, mask smoothing,
// region extraction, rule evaluation, overlay drawing) behind one object, the
// `FramingAdvisor`, invoked once per incoming frame.
//
// An advisor is a per-stream object with an explicit lifecycle: construct one
// when a video stream opens, feed it frames in arrival order, discard it when
// the stream ends. Its background statistics are a moving history of one
// camera feed; sharing an advisor across streams, or reordering frames,
// corrupts the subject estimate. Concurrent streams each get their own
// advisor (see the `session` module, which enforces this by construction).

use crate::core_modules::background::BackgroundModel;
use crate::core_modules::framing;
use crate::core_modules::overlay;
use crate::core_modules::regions;
use image::RgbImage;
use tracing::trace;

// Re-export key data structures for the public API.
pub use crate::config::AdvisorConfig;
pub use crate::core_modules::framing::{BoundingBox, FramingStatus};
pub use crate::core_modules::overlay::OverlayFrame;
pub use crate::error::AdvisorError;

/// The complete output for one processed frame.
#[derive(Debug, Clone)]
pub struct FrameVerdict {
    /// The pass/fail judgment and player-facing message.
    pub status: FramingStatus,
    /// The estimated subject extent; `None` is the normal no-subject state.
    pub subject: Option<BoundingBox>,
    /// An annotated copy of the input frame (or a clean copy if annotation
    /// could not proceed). The input frame itself is never touched.
    pub overlay: OverlayFrame,
}

/// The main, per-stream framing engine.
pub struct FramingAdvisor {
    background: BackgroundModel,
    config: AdvisorConfig,
}

impl FramingAdvisor {
    /// Builds an advisor for one video stream. Fails only on invalid
    /// configuration.
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        config.validate()?;
        let background = BackgroundModel::new(
            config.history_length,
            config.variance_threshold,
            config.suppress_shadows,
        );
        Ok(Self { background, config })
    }

    /// Estimates the subject's bounding box for the next frame in the stream.
    ///
    /// History-dependent: the answer for a given frame depends on every frame
    /// fed before it. `Ok(None)` means no subject, the expected steady state at
    /// stream start while the model is still learning the scene.
    pub fn estimate_subject(
        &mut self,
        frame: &RgbImage,
    ) -> Result<Option<BoundingBox>, AdvisorError> {
        self.reject_degenerate(frame)?;

        let mask = self.background.apply(frame);
        let smoothed = mask.median_filtered(self.config.median_kernel);
        let subject = regions::select_subject(&smoothed, self.config.min_foreground_area_fraction);
        trace!(foreground = smoothed.count(), ?subject, "subject estimate");
        Ok(subject)
    }

    /// Evaluates the framing rules against a bounding box. Pure; exposed
    /// separately so still photos with caller-supplied boxes can reuse it.
    pub fn evaluate_framing(
        &self,
        frame_height: u32,
        frame_width: u32,
        bbox: Option<BoundingBox>,
    ) -> FramingStatus {
        framing::evaluate_framing(frame_height, frame_width, bbox, &self.config.rules())
    }

    /// Draws the guidance overlay onto a copy of the frame. Best-effort: a
    /// frame the overlay cannot fit on comes back as a clean unannotated copy.
    pub fn render_overlay(&self, frame: &RgbImage, status: &FramingStatus) -> OverlayFrame {
        overlay::render_guides(frame, status, self.config.banner_height)
    }

    /// The per-frame composite: estimate, evaluate, annotate. This is the unit
    /// a live-preview pipeline invokes once per incoming frame.
    pub fn process(&mut self, frame: &RgbImage) -> Result<FrameVerdict, AdvisorError> {
        let subject = self.estimate_subject(frame)?;
        let status = self.evaluate_framing(frame.height(), frame.width(), subject);
        let overlay = self.render_overlay(frame, &status);
        Ok(FrameVerdict {
            status,
            subject,
            overlay,
        })
    }

    /// Discards the learned background; the next frame reseeds it. For stream
    /// restarts that reuse the advisor.
    pub fn reset(&mut self) {
        self.background.reset();
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn reject_degenerate(&self, frame: &RgbImage) -> Result<(), AdvisorError> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(AdvisorError::DegenerateFrame { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::framing::MSG_NO_SUBJECT;
    use image::Rgb;

    fn backdrop(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([100, 100, 100]))
    }

    fn with_subject(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RgbImage {
        let mut frame = backdrop(width, height);
        for y in y0..y1 {
            for x in x0..x1 {
                frame.put_pixel(x, y, Rgb([240, 240, 240]));
            }
        }
        frame
    }

    #[test]
    fn degenerate_frame_fails_fast() {
        let mut advisor = FramingAdvisor::new(AdvisorConfig::default()).unwrap();
        let result = advisor.process(&RgbImage::new(0, 0));
        assert!(matches!(
            result,
            Err(AdvisorError::DegenerateFrame {
                width: 0,
                height: 0
            })
        ));
    }

    #[test]
    fn stream_start_reports_no_subject() {
        let mut advisor = FramingAdvisor::new(AdvisorConfig::default()).unwrap();
        let verdict = advisor.process(&backdrop(640, 480)).unwrap();
        assert!(verdict.subject.is_none());
        assert!(!verdict.status.ok);
        assert!(verdict.status.message.contains("No subject detected"));
        assert_eq!(verdict.status.message, MSG_NO_SUBJECT);
    }

    #[test]
    fn well_framed_subject_passes_end_to_end() {
        let mut advisor = FramingAdvisor::new(AdvisorConfig::default()).unwrap();
        for _ in 0..10 {
            advisor.process(&backdrop(640, 480)).unwrap();
        }
        // Subject spanning x [256, 384), y [40, 460): centered, head above the
        // 15% line, feet below the 90% line.
        let verdict = advisor
            .process(&with_subject(640, 480, 256, 40, 384, 460))
            .unwrap();
        let bbox = verdict.subject.expect("subject should be detected");
        assert_eq!((bbox.x1, bbox.y1, bbox.x2, bbox.y2), (256, 40, 384, 460));
        assert!(verdict.status.ok);
        assert!(verdict.overlay.is_annotated());
    }

    #[test]
    fn off_center_subject_fails_end_to_end() {
        let mut advisor = FramingAdvisor::new(AdvisorConfig::default()).unwrap();
        for _ in 0..10 {
            advisor.process(&backdrop(640, 480)).unwrap();
        }
        let verdict = advisor
            .process(&with_subject(640, 480, 20, 40, 148, 460))
            .unwrap();
        assert!(verdict.subject.is_some());
        assert!(!verdict.status.ok);
    }

    #[test]
    fn tiny_motion_blob_is_filtered_as_noise() {
        let mut advisor = FramingAdvisor::new(AdvisorConfig::default()).unwrap();
        for _ in 0..10 {
            advisor.process(&backdrop(640, 480)).unwrap();
        }
        // A 40x40 flicker: 1600 px² bounding box, under the 2% floor (6144 px²).
        let verdict = advisor
            .process(&with_subject(640, 480, 300, 200, 340, 240))
            .unwrap();
        assert!(verdict.subject.is_none());
        assert!(!verdict.status.ok);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = AdvisorConfig {
            median_kernel: 4,
            ..AdvisorConfig::default()
        };
        assert!(FramingAdvisor::new(config).is_err());
    }
}
