// THEORY:
// The `capture` module covers everything a player needs *before* the live
// pipeline runs: which way to point the camera, and a one-shot framing check on
// a still photo. A still has no temporal history to learn a background from, so
// the photo path reuses only the pure rule layer and the overlay drawing, with
// the subject box supplied by the caller (or absent).

use crate::core_modules::framing::{self, BoundingBox, FramingRules, FramingStatus};
use crate::core_modules::overlay::{self, OverlayFrame};
use crate::error::AdvisorError;
use image::RgbImage;

/// The two standard swing-capture camera positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAngle {
    /// Camera perpendicular to the target line, facing the player.
    FaceOn,
    /// Camera behind the player, looking down the target line.
    DownTheLine,
}

/// Recommended physical camera placement for one angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupRecommendation {
    /// Camera height range in feet (about hand height).
    pub height_ft: (f32, f32),
    /// Distance range from the ball/player area in feet.
    pub distance_ft: (f32, f32),
    /// Setup notes, one per line.
    pub notes: &'static [&'static str],
}

const FACE_ON_SETUP: SetupRecommendation = SetupRecommendation {
    height_ft: (3.5, 4.5),
    distance_ft: (8.0, 12.0),
    notes: &[
        "Camera perpendicular to target line (front-on).",
        "Frame full body: shoes to cap, with a little space above/below.",
        "Place phone on tripod; avoid zoom; use landscape.",
        "60 fps if available; avoid strong backlight.",
    ],
};

const DOWN_THE_LINE_SETUP: SetupRecommendation = SetupRecommendation {
    height_ft: (3.5, 4.5),
    distance_ft: (10.0, 15.0),
    notes: &[
        "Camera on hand line (not the ball line), straight behind.",
        "Lens points through hands at address toward target.",
        "Frame full body + club; include some turf behind feet.",
        "Keep horizon level; use landscape; 60 fps if available.",
    ],
};

/// The recommended setup for a capture angle.
pub fn recommended_setup(angle: CameraAngle) -> SetupRecommendation {
    match angle {
        CameraAngle::FaceOn => FACE_ON_SETUP,
        CameraAngle::DownTheLine => DOWN_THE_LINE_SETUP,
    }
}

/// The result of a still-photo framing check.
#[derive(Debug, Clone)]
pub struct PhotoCheck {
    pub status: FramingStatus,
    pub overlay: OverlayFrame,
}

/// Runs the framing rules on a still photo with a caller-supplied subject box
/// (or none) and draws the alignment overlay. No background model is involved.
pub fn check_photo(
    photo: &RgbImage,
    subject: Option<BoundingBox>,
    rules: &FramingRules,
) -> Result<PhotoCheck, AdvisorError> {
    let (width, height) = photo.dimensions();
    if width == 0 || height == 0 {
        return Err(AdvisorError::DegenerateFrame { width, height });
    }
    let status = framing::evaluate_framing(height, width, subject, rules);
    let overlay = overlay::render_alignment_grid(photo);
    Ok(PhotoCheck { status, overlay })
}
