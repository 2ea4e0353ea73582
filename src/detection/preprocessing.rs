use image::{GrayImage, Rgb, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;

/// Keep only pixels covered by the foreground mask; everything else black.
pub fn apply_mask(img: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut result = RgbImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        if mask.get_pixel(x, y)[0] > 0 {
            result.put_pixel(x, y, *pixel);
        } else {
            result.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    result
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Apply Gaussian blur to reduce noise, parameterized by an odd kernel width.
pub fn apply_blur(img: &GrayImage, kernel: u32) -> GrayImage {
    gaussian_blur_f32(img, kernel_sigma(kernel))
}

/// Sigma equivalent to a k-wide Gaussian kernel (k=7 gives 1.4).
fn kernel_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel.max(1) - 1) as f32 * 0.5 - 1.0) + 0.8
}

/// Binarize with a fixed intensity threshold.
pub fn binarize(img: &GrayImage, intensity_threshold: u8) -> GrayImage {
    threshold(img, intensity_threshold, ThresholdType::Binary)
}
