// THEORY:
// The `Pixel` module is the most fundamental unit of the framing engine. It is a
// "dumb" data container for a single RGB pixel plus the comparative heuristics the
// background model needs: how far a pixel sits from a learned mean color, and
// whether it looks like a uniformly darkened copy of that mean (a cast shadow).
//
// Key architectural principles:
// 1.  **Comparative Analysis**: The interesting methods all take a model mean as
//     input. A pixel is meaningless on its own; its value is in measuring its
//     relationship to the background learned for its location.
// 2.  **Single-Pixel Scope**: Nothing here reads neighbors or history. Spatial
//     smoothing lives in the mask module, temporal statistics in the background
//     model.

pub mod pixel {
    pub type Channel = u8;
    pub type Intensity = f32;
    /// A learned per-location mean color, one entry per RGB channel.
    pub type MeanColor = [Intensity; 3];

    // Means darker than this are too close to black for a stable brightness ratio.
    const RATIO_EPSILON: Intensity = 1e-3;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// The channels widened to `Intensity`, in the shape the model stores.
        pub fn channels(&self) -> MeanColor {
            [
                self.red as Intensity,
                self.green as Intensity,
                self.blue as Intensity,
            ]
        }

        /// Squared RGB distance between this pixel and a learned mean, summed
        /// over the three channels.
        pub fn distance_squared(&self, mean: &MeanColor) -> Intensity {
            let channels = self.channels();
            let mut total = 0.0;
            for c in 0..3 {
                let delta = channels[c] - mean[c];
                total += delta * delta;
            }
            total
        }

        /// Brightness of this pixel relative to a learned mean: the scale factor
        /// that best maps the mean onto this pixel. A cast shadow is the mean
        /// dimmed by a uniform factor below 1.0. `None` when the mean is too
        /// close to black for the ratio to be meaningful.
        pub fn brightness_ratio(&self, mean: &MeanColor) -> Option<Intensity> {
            let mean_energy: Intensity = mean.iter().map(|m| m * m).sum();
            if mean_energy < RATIO_EPSILON {
                return None;
            }
            let channels = self.channels();
            let projection: Intensity = channels.iter().zip(mean).map(|(p, m)| p * m).sum();
            Some(projection / mean_energy)
        }

        /// Residual color distortion after scaling the mean by `ratio`: how far
        /// this pixel is from being a uniformly dimmed/brightened copy of the
        /// mean. Near zero for true shadows.
        pub fn distortion_squared(&self, mean: &MeanColor, ratio: Intensity) -> Intensity {
            let channels = self.channels();
            let mut total = 0.0;
            for c in 0..3 {
                let delta = channels[c] - ratio * mean[c];
                total += delta * delta;
            }
            total
        }
    }

    impl From<image::Rgb<Channel>> for Pixel {
        fn from(rgb: image::Rgb<Channel>) -> Self {
            Pixel::new(rgb.0[0], rgb.0[1], rgb.0[2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn distance_is_zero_against_matching_mean() {
        let pixel = Pixel::new(10, 20, 30);
        assert_eq!(pixel.distance_squared(&[10.0, 20.0, 30.0]), 0.0);
    }

    #[test]
    fn distance_sums_over_channels() {
        let pixel = Pixel::new(13, 24, 30);
        // 3^2 + 4^2 + 0^2
        assert_eq!(pixel.distance_squared(&[10.0, 20.0, 30.0]), 25.0);
    }

    #[test]
    fn shadow_pixel_has_fractional_ratio_and_no_distortion() {
        let mean = [200.0, 100.0, 50.0];
        let shadow = Pixel::new(140, 70, 35); // mean scaled by 0.7
        let ratio = shadow.brightness_ratio(&mean).unwrap();
        assert!((ratio - 0.7).abs() < 1e-3);
        assert!(shadow.distortion_squared(&mean, ratio) < 1e-2);
    }

    #[test]
    fn black_mean_yields_no_ratio() {
        let pixel = Pixel::new(50, 50, 50);
        assert!(pixel.brightness_ratio(&[0.0, 0.0, 0.0]).is_none());
    }
}
