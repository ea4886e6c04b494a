// THEORY:
// The `framing` module holds the rule layer: given a frame's dimensions and the
// subject's bounding box (or its absence), is the shot well framed for swing
// capture? The rules are deliberately simple and fully tunable: a horizontal
// center band, a head line the subject must cross above, and a feet line it must
// cross below.
//
// Everything in this module is a pure function of its inputs. The stateful,
// history-dependent work (finding the box) happens upstream; this layer can be
// exercised exhaustively in tests with hand-built boxes.

/// Status line when no subject was found in the frame.
pub const MSG_NO_SUBJECT: &str = "No subject detected. Stand fully in frame.";
/// Status line when every framing rule passes.
pub const MSG_GOOD: &str = "Framing looks good.";
/// Status line when at least one framing rule fails.
pub const MSG_ADJUST: &str = "Adjust: center yourself, include head and feet.";

/// Axis-aligned subject extent in pixel coordinates; `x2`/`y2` are exclusive
/// (`x2 = x1 + width`). Absence of a subject is `Option<BoundingBox>::None`,
/// never a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Enclosed area in pixels.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Horizontal center, kept fractional so band checks are exact.
    pub fn center_x(&self) -> f64 {
        (self.x1 + self.x2) as f64 / 2.0
    }
}

/// The judgment for one frame: pass/fail plus the line shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingStatus {
    pub ok: bool,
    pub message: String,
}

/// The tunable rule thresholds, all as fractions of the frame dimensions.
#[derive(Debug, Clone, Copy)]
pub struct FramingRules {
    /// Horizontal band (inclusive) the subject's center must fall into.
    pub center_band: (f64, f64),
    /// The subject's top must sit strictly above this line (head not cropped).
    pub head_line: f64,
    /// The subject's bottom must sit strictly below this line (feet not cropped).
    pub feet_line: f64,
}

impl Default for FramingRules {
    fn default() -> Self {
        Self {
            center_band: (0.40, 0.60),
            head_line: 0.15,
            feet_line: 0.90,
        }
    }
}

/// Evaluates the framing rules for one frame. Pure: identical inputs always
/// produce identical output, independent of call order.
pub fn evaluate_framing(
    frame_height: u32,
    frame_width: u32,
    bbox: Option<BoundingBox>,
    rules: &FramingRules,
) -> FramingStatus {
    let Some(bbox) = bbox else {
        return FramingStatus {
            ok: false,
            message: MSG_NO_SUBJECT.to_string(),
        };
    };

    let width = frame_width as f64;
    let height = frame_height as f64;
    let center_x = bbox.center_x();

    let center_ok =
        rules.center_band.0 * width <= center_x && center_x <= rules.center_band.1 * width;
    let head_ok = (bbox.y1 as f64) < rules.head_line * height;
    let feet_ok = (bbox.y2 as f64) > rules.feet_line * height;

    let ok = center_ok && head_ok && feet_ok;
    FramingStatus {
        ok,
        message: if ok { MSG_GOOD } else { MSG_ADJUST }.to_string(),
    }
}
