use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::dilate;

use crate::models::SegmentationColor;

/// Convert an RGB triple to the engine's native HSV scales: hue 0-180
/// (half degrees), saturation and value 0-255.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h / 2.0, s * 255.0, max * 255.0)
}

/// Membership test for the cyclic hue band around `target`.
///
/// Hue lives on a circle of size 180, so the band can wrap across either end
/// of the domain. Three cases, matching the tolerance geometry:
fn hue_in_band(h: f32, target: f32, tolerance: f32) -> bool {
    if target >= tolerance && target + tolerance <= 180.0 {
        // e.g. target=50, tolerance=10: valid band is [40, 60]
        h >= target - tolerance && h <= target + tolerance
    } else if target < tolerance {
        // e.g. target=5, tolerance=10: band wraps below zero,
        // valid bands are [0, 15] and [175, 180]
        h <= target + tolerance || h >= 180.0 - (tolerance - target)
    } else {
        // e.g. target=175, tolerance=10: band wraps above 180,
        // valid bands are [165, 180] and [0, 5]
        h >= target - tolerance || h <= target + tolerance - 180.0
    }
}

/// Clamped interval test for the non-cyclic saturation/value channels.
fn channel_in_band(v: f32, target: f32, tolerance: f32) -> bool {
    v >= (target - tolerance).max(0.0) && v <= (target + tolerance).min(255.0)
}

/// Threshold the frame against the HSV band around the segmentation color.
///
/// A pixel is foreground (255) iff all three channels fall inside their
/// bands. Pure function of its inputs.
pub fn hsv_mask(img: &RgbImage, color: &SegmentationColor) -> GrayImage {
    let mut mask = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        let foreground = hue_in_band(h, color.hue, color.hue_tolerance)
            && channel_in_band(s, color.saturation, color.saturation_tolerance)
            && channel_in_band(v, color.value, color.value_tolerance);
        if foreground {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Remove speckle noise from the mask: median filter followed by dilation
/// with a square structuring element, both of width `dilation_size`.
pub fn clean_mask(mask: &GrayImage, dilation_size: u32) -> GrayImage {
    // kernel width k covers a radius of (k-1)/2 around each pixel
    let radius = dilation_size / 2;
    let filtered = median_filter(mask, radius, radius);
    dilate(&filtered, Norm::LInf, radius as u8)
}
