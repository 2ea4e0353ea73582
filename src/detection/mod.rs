pub mod contours;
pub mod defects;
pub mod hull;
pub mod preprocessing;
pub mod segmentation;
pub mod steps;

use anyhow::Result;
use image::DynamicImage;

use crate::models::{Detection, SegmentationColor};

/// Per-frame fingertip detector.
///
/// Holds only tunables; every `detect` call is an independent, stateless
/// segment -> contour -> hull -> defect pass over one frame, so distinct
/// frame streams can each own their own detector with nothing shared.
pub struct FingerDetector {
    /// Fixed binarization intensity applied after masking and blurring.
    pub intensity_threshold: u8,
    /// Odd Gaussian kernel width used to suppress contour noise.
    pub blur_kernel: u32,
    /// Median/dilation kernel width used to clean the segmentation mask.
    pub dilation_size: u32,
    /// Hull points within this pixel distance collapse into one cluster.
    pub neighborhood_size: f64,
    /// Fraction of the hand's vertical extent discarded at the bottom.
    pub lower_cut_percentage: f32,
    /// Maximum included defect angle (degrees) for a fingertip corner.
    pub max_fingertip_angle: f32,
    /// Pixels to nudge an accepted tip along the finger axis.
    pub correction_scale: f32,
    pub verbose: bool,
}

impl FingerDetector {
    pub fn new() -> Self {
        Self {
            intensity_threshold: 30,
            blur_kernel: 7,
            dilation_size: 5,
            neighborhood_size: 50.0,
            lower_cut_percentage: 0.3,
            max_fingertip_angle: 60.0,
            correction_scale: 12.0,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_intensity_threshold(mut self, intensity_threshold: u8) -> Self {
        self.intensity_threshold = intensity_threshold;
        self
    }

    pub fn with_correction_scale(mut self, correction_scale: f32) -> Self {
        self.correction_scale = correction_scale;
        self
    }

    /// Run the full per-frame pipeline on an image.
    ///
    /// Returns the fingertip positions and the contour they came from. An
    /// empty result is the expected idle state, not an error; the only error
    /// path is a malformed segmentation color.
    pub fn detect(&self, img: &DynamicImage, color: &SegmentationColor) -> Result<Detection> {
        color.validate()?;
        let rgb = img.to_rgb8();

        // Segment the hand-colored region and clean the mask
        let mask = segmentation::hsv_mask(&rgb, color);
        let mask = segmentation::clean_mask(&mask, self.dilation_size);

        // Remove noise and binarize what survived the mask
        let masked = preprocessing::apply_mask(&rgb, &mask);
        let gray = preprocessing::to_grayscale(&masked);
        let blurred = preprocessing::apply_blur(&gray, self.blur_kernel);
        let binary = preprocessing::binarize(&blurred, self.intensity_threshold);

        let candidates = contours::find_external_contours(&binary);
        if self.verbose {
            println!("Found {} candidate contours", candidates.len());
        }

        let Some(contour) = contours::largest_contour(candidates) else {
            // Nothing inside the threshold band this frame
            return Ok(Detection::default());
        };

        let hull_indices = hull::convex_hull_indices(&contour);
        let reduced = hull::reduce_hull(&contour, &hull_indices, self.neighborhood_size);
        if self.verbose {
            println!(
                "Hull reduced from {} to {} points",
                hull_indices.len(),
                reduced.indices.len()
            );
        }

        let fingertips = defects::detect_fingertips(
            &contour,
            &reduced.indices,
            self.correction_scale,
            self.lower_cut_percentage,
            self.max_fingertip_angle,
        );
        if self.verbose {
            println!("Detected {} fingertips", fingertips.len());
        }

        Ok(Detection {
            fingertips,
            contour,
        })
    }
}

impl Default for FingerDetector {
    fn default() -> Self {
        Self::new()
    }
}
