// THEORY:
// The `overlay` module is the presentation layer of the framing engine. It takes
// a frame plus a framing judgment and produces an annotated *copy*: a 3x3
// alignment grid, a head box, a feet-margin box, and a full-width status banner.
// The caller's buffer is never touched.
//
// Key architectural principles:
// 1.  **Copy-on-Annotate**: Every entry point clones the input before drawing.
//     The live pipeline may still be encoding or displaying the original.
// 2.  **Best Effort, Never Blocking**: Annotation is cosmetic; the status text is
//     the actionable output. A frame that cannot host the overlay (smaller than
//     the banner, or too small for the grid) comes back as
//     `OverlayFrame::Unannotated` with a clean copy instead of failing the
//     pipeline or shipping a half-drawn frame.
// 3.  **No Font Dependency**: The banner shows one of two fixed strings, so the
//     capital letters it needs are rasterized from a small built-in 5x7 glyph
//     table instead of a font stack.

use crate::core_modules::framing::FramingStatus;
use image::{Rgb, RgbImage};
use tracing::debug;

const GRID_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const STATUS_OK_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const STATUS_ADJUST_COLOR: Rgb<u8> = Rgb([255, 165, 0]);
const PHOTO_GUIDE_COLOR: Rgb<u8> = Rgb([255, 200, 0]);
const CENTER_LINE_COLOR: Rgb<u8> = Rgb([0, 180, 255]);
const BANNER_TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const GRID_LINE_WIDTH: u32 = 2;
const GUIDE_BOX_WIDTH: u32 = 3;
const BANNER_TEXT_MARGIN: u32 = 10;

/// Banner caption when the framing rules pass.
pub const BANNER_TEXT_OK: &str = "OK";
/// Banner caption when the player needs to adjust.
pub const BANNER_TEXT_ADJUST: &str = "ADJUST FRAMING";

// Head box and feet-margin geometry, as fractions of the frame.
const HEAD_BOX: (f64, f64, f64, f64) = (0.35, 0.05, 0.65, 0.22);
const FEET_MARGIN: (f64, f64, f64, f64) = (0.10, 0.92, 0.90, 0.98);

/// The result of an annotation pass. Both variants own a copy of the input
/// frame with identical dimensions; `Unannotated` means the overlay could not
/// be drawn and the copy is clean.
#[derive(Debug, Clone)]
pub enum OverlayFrame {
    Annotated(RgbImage),
    Unannotated(RgbImage),
}

impl OverlayFrame {
    pub fn image(&self) -> &RgbImage {
        match self {
            OverlayFrame::Annotated(image) | OverlayFrame::Unannotated(image) => image,
        }
    }

    pub fn into_image(self) -> RgbImage {
        match self {
            OverlayFrame::Annotated(image) | OverlayFrame::Unannotated(image) => image,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, OverlayFrame::Annotated(_))
    }
}

/// Draws the live-preview overlay: grid, guide boxes colored by the status, and
/// the status banner. Never fails; frames that cannot host the overlay come
/// back unannotated.
pub fn render_guides(frame: &RgbImage, status: &FramingStatus, banner_height: u32) -> OverlayFrame {
    let mut out = frame.clone();
    match draw_guides(&mut out, status.ok, banner_height) {
        Ok(()) => OverlayFrame::Annotated(out),
        Err(reason) => {
            debug!(reason, "skipping overlay; returning clean copy");
            OverlayFrame::Unannotated(frame.clone())
        }
    }
}

/// Draws the photo-only alignment overlay: grid, head/feet guide boxes, and a
/// vertical center line as a spine-alignment hint. No banner, since a still
/// photo has no live status to announce.
pub fn render_alignment_grid(frame: &RgbImage) -> OverlayFrame {
    let mut out = frame.clone();
    match draw_alignment_grid(&mut out) {
        Ok(()) => OverlayFrame::Annotated(out),
        Err(reason) => {
            debug!(reason, "skipping alignment grid; returning clean copy");
            OverlayFrame::Unannotated(frame.clone())
        }
    }
}

fn draw_guides(image: &mut RgbImage, ok: bool, banner_height: u32) -> Result<(), &'static str> {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return Err("frame too small for the alignment grid");
    }
    if height <= banner_height {
        return Err("frame shorter than the status banner");
    }

    draw_thirds_grid(image);

    let guide_color = if ok { STATUS_OK_COLOR } else { STATUS_ADJUST_COLOR };
    draw_fraction_outline(image, HEAD_BOX, GUIDE_BOX_WIDTH, guide_color);
    draw_fraction_outline(image, FEET_MARGIN, GUIDE_BOX_WIDTH, guide_color);

    fill_rect(image, 0, 0, width, banner_height, guide_color);
    let caption = if ok { BANNER_TEXT_OK } else { BANNER_TEXT_ADJUST };
    let text_y = banner_height.saturating_sub(glyphs::LINE_HEIGHT) / 2;
    glyphs::draw_text(image, caption, BANNER_TEXT_MARGIN, text_y, BANNER_TEXT_COLOR);

    Ok(())
}

fn draw_alignment_grid(image: &mut RgbImage) -> Result<(), &'static str> {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return Err("photo too small for the alignment grid");
    }

    draw_thirds_grid(image);
    draw_fraction_outline(image, HEAD_BOX, GUIDE_BOX_WIDTH, PHOTO_GUIDE_COLOR);
    draw_fraction_outline(image, FEET_MARGIN, GUIDE_BOX_WIDTH, PHOTO_GUIDE_COLOR);

    // Spine alignment hint, drawn last so it stays visible across the boxes.
    let center_x = width / 2;
    fill_rect(
        image,
        center_x,
        0,
        center_x + GRID_LINE_WIDTH,
        height,
        CENTER_LINE_COLOR,
    );

    Ok(())
}

/// Two vertical and two horizontal lines at 1/3 and 2/3 of each dimension.
fn draw_thirds_grid(image: &mut RgbImage) {
    let (width, height) = image.dimensions();
    for i in 1..=2u32 {
        let x = width * i / 3;
        let y = height * i / 3;
        fill_rect(image, x, 0, x + GRID_LINE_WIDTH, height, GRID_COLOR);
        fill_rect(image, 0, y, width, y + GRID_LINE_WIDTH, GRID_COLOR);
    }
}

/// Outline of a rectangle given as (x0, y0, x1, y1) fractions of the frame.
fn draw_fraction_outline(
    image: &mut RgbImage,
    fractions: (f64, f64, f64, f64),
    thickness: u32,
    color: Rgb<u8>,
) {
    let (width, height) = image.dimensions();
    let x0 = (width as f64 * fractions.0) as u32;
    let y0 = (height as f64 * fractions.1) as u32;
    let x1 = (width as f64 * fractions.2) as u32;
    let y1 = (height as f64 * fractions.3) as u32;

    fill_rect(image, x0, y0, x1, (y0 + thickness).min(y1), color);
    fill_rect(image, x0, y1.saturating_sub(thickness).max(y0), x1, y1, color);
    fill_rect(image, x0, y0, (x0 + thickness).min(x1), y1, color);
    fill_rect(image, x1.saturating_sub(thickness).max(x0), y0, x1, y1, color);
}

/// Fills [x0, x1) x [y0, y1), clamped to the image bounds.
fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// A minimal 5x7 block-capital glyph set covering the two banner captions.
mod glyphs {
    use image::{Rgb, RgbImage};

    const GLYPH_WIDTH: u32 = 5;
    const GLYPH_HEIGHT: u32 = 7;
    const GLYPH_SPACING: u32 = 1;
    const SCALE: u32 = 2;

    /// Rendered text height in pixels, for vertical centering.
    pub const LINE_HEIGHT: u32 = GLYPH_HEIGHT * SCALE;

    // Each glyph is seven rows of five bits, most significant bit leftmost.
    fn rows(character: char) -> [u8; 7] {
        match character {
            'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
            'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
            'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
            'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
            'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
            'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
            'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
            'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
            'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
            'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
            'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
            'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
            'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
            // Unknown characters render as a blank cell.
            _ => [0; 7],
        }
    }

    /// Draws `text` starting at (`origin_x`, `origin_y`), clipping at the image
    /// edges rather than failing.
    pub fn draw_text(image: &mut RgbImage, text: &str, origin_x: u32, origin_y: u32, color: Rgb<u8>) {
        let (width, height) = image.dimensions();
        let mut pen_x = origin_x;
        for character in text.chars() {
            let glyph = rows(character);
            for (row_index, row) in glyph.into_iter().enumerate() {
                for column in 0..GLYPH_WIDTH {
                    if (row as u32) & (1 << (GLYPH_WIDTH - 1 - column)) == 0 {
                        continue;
                    }
                    for sub_y in 0..SCALE {
                        for sub_x in 0..SCALE {
                            let x = pen_x + column * SCALE + sub_x;
                            let y = origin_y + row_index as u32 * SCALE + sub_y;
                            if x < width && y < height {
                                image.put_pixel(x, y, color);
                            }
                        }
                    }
                }
            }
            pen_x += (GLYPH_WIDTH + GLYPH_SPACING) * SCALE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::framing::{MSG_ADJUST, MSG_GOOD};
    use image::Rgb;

    fn status(ok: bool) -> FramingStatus {
        FramingStatus {
            ok,
            message: if ok { MSG_GOOD } else { MSG_ADJUST }.to_string(),
        }
    }

    fn gray_frame(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([90, 90, 90]))
    }

    #[test]
    fn input_frame_is_never_mutated() {
        let frame = gray_frame(320, 240);
        let before = frame.clone();
        let overlay = render_guides(&frame, &status(true), 40);
        assert!(overlay.is_annotated());
        assert_eq!(frame.as_raw(), before.as_raw());
    }

    #[test]
    fn output_dimensions_match_input() {
        let frame = gray_frame(321, 243);
        let overlay = render_guides(&frame, &status(false), 40);
        assert_eq!(overlay.image().dimensions(), (321, 243));
    }

    #[test]
    fn banner_takes_the_status_color() {
        let frame = gray_frame(320, 240);
        let good = render_guides(&frame, &status(true), 40);
        let bad = render_guides(&frame, &status(false), 40);
        // Far right of the banner, clear of the caption glyphs.
        assert_eq!(*good.image().get_pixel(315, 5), STATUS_OK_COLOR);
        assert_eq!(*bad.image().get_pixel(315, 5), STATUS_ADJUST_COLOR);
    }

    #[test]
    fn grid_lines_land_on_thirds() {
        let frame = gray_frame(300, 300);
        let overlay = render_guides(&frame, &status(true), 40);
        // Vertical line at x = 100, sampled away from banner/boxes/grid rows.
        assert_eq!(*overlay.image().get_pixel(100, 150), GRID_COLOR);
        // Untouched pixel keeps the source color.
        assert_eq!(*overlay.image().get_pixel(150, 150), Rgb([90, 90, 90]));
    }

    #[test]
    fn frame_shorter_than_banner_falls_back_to_clean_copy() {
        let frame = gray_frame(64, 32);
        let overlay = render_guides(&frame, &status(false), 40);
        assert!(!overlay.is_annotated());
        assert_eq!(overlay.image().as_raw(), frame.as_raw());
    }

    #[test]
    fn alignment_grid_draws_center_line_and_guide_boxes() {
        let frame = gray_frame(300, 300);
        let overlay = render_alignment_grid(&frame);
        assert!(overlay.is_annotated());
        let image = overlay.image();
        // Center line at x = 150, sampled at mid-height.
        assert_eq!(*image.get_pixel(150, 150), CENTER_LINE_COLOR);
        // Head box top edge: y = 0.05 * 300 = 15, x within [105, 195].
        assert_eq!(*image.get_pixel(120, 15), PHOTO_GUIDE_COLOR);
        // Input untouched.
        assert_eq!(*frame.get_pixel(150, 150), Rgb([90, 90, 90]));
    }

    #[test]
    fn degenerate_photo_falls_back_without_panicking() {
        let frame = gray_frame(2, 2);
        let overlay = render_alignment_grid(&frame);
        assert!(!overlay.is_annotated());
    }
}
