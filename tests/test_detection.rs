use std::sync::Arc;

use fingertips::detection::steps::{
    ApplyMaskStep, BlurStep, GrayscaleStep, HsvMaskStep, ThresholdStep,
};
use fingertips::{FingerDetector, Pipeline, SegmentationColor};
use image::{DynamicImage, Rgb, RgbImage};

const HAND_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

fn hand_color() -> SegmentationColor {
    // Pure green sits at hue 60 on the half-scale
    SegmentationColor::new(60.0, 255.0, 255.0, 10.0, 40.0, 40.0)
}

/// Black frame with a green hand silhouette: a palm block and one narrow
/// triangular finger pointing up, apex at (100, 40).
fn one_finger_frame() -> DynamicImage {
    let mut img = RgbImage::new(200, 220);

    for y in 100..180 {
        for x in 60..140 {
            img.put_pixel(x, y, HAND_COLOR);
        }
    }

    // Finger: half-width grows from 0 at the apex to 15 at the palm
    for y in 40..100 {
        let half_width = (y - 40) / 4;
        for x in (100 - half_width)..=(100 + half_width) {
            img.put_pixel(x as u32, y as u32, HAND_COLOR);
        }
    }

    DynamicImage::ImageRgb8(img)
}

#[test]
fn test_no_foreground_is_the_idle_state() -> anyhow::Result<()> {
    // Uniform blue frame: nowhere near the green threshold band
    let mut img = RgbImage::new(100, 100);
    for pixel in img.pixels_mut() {
        *pixel = Rgb([0, 0, 255]);
    }

    let detector = FingerDetector::new();
    let detection = detector.detect(&DynamicImage::ImageRgb8(img), &hand_color())?;

    assert!(detection.fingertips.is_empty());
    assert!(detection.contour.is_empty());
    Ok(())
}

#[test]
fn test_single_finger_yields_one_corrected_tip() -> anyhow::Result<()> {
    let frame = one_finger_frame();
    let detector = FingerDetector::new().with_correction_scale(10.0);

    let detection = detector.detect(&frame, &hand_color())?;

    assert!(!detection.contour.is_empty());
    assert_eq!(
        detection.fingertips.len(),
        1,
        "expected exactly one fingertip, got {:?}",
        detection.fingertips
    );

    // The tip sits near the synthetic apex, nudged down into the finger.
    // Mask cleanup erodes the one-pixel-wide apex slightly, so allow for a
    // few pixels of drift on top of the correction offset.
    let tip = detection.fingertips[0];
    let contour_top = detection
        .contour
        .points
        .iter()
        .map(|p| p.y)
        .min()
        .expect("non-empty contour");

    assert!((tip.x - 100).abs() <= 6, "tip drifted to x={}", tip.x);
    assert!(tip.y >= 40 && tip.y <= 75, "tip drifted to y={}", tip.y);
    assert!(tip.y > contour_top, "correction must point into the finger");

    let dx = (tip.x - 100) as f64;
    let dy = (tip.y - 40) as f64;
    assert!((dx * dx + dy * dy).sqrt() <= 25.0);
    Ok(())
}

#[test]
fn test_detect_rejects_malformed_color() {
    let frame = one_finger_frame();
    let detector = FingerDetector::new();
    let bad = SegmentationColor::new(60.0, 255.0, 255.0, -5.0, 40.0, 40.0);

    assert!(detector.detect(&frame, &bad).is_err());
}

#[test]
fn test_debug_pipeline_dumps_every_stage() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let debug_dir = dir.path().join("stages");

    let pipeline = Pipeline::new()
        .add_step(Arc::new(HsvMaskStep {
            color: hand_color(),
            dilation_size: 5,
        }))
        .add_step(Arc::new(ApplyMaskStep))
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(BlurStep { kernel: 7 }))
        .add_step(Arc::new(ThresholdStep { intensity: 30 }))
        .with_debug(debug_dir.clone())?;

    let result = pipeline.run(one_finger_frame())?;

    for stage in [
        "00_input",
        "01_hsv_mask",
        "02_apply_mask",
        "03_grayscale_conversion",
        "04_gaussian_blur",
        "05_intensity_threshold",
    ] {
        assert!(
            debug_dir.join(stage).join("01.png").is_file(),
            "missing debug output for {}",
            stage
        );
    }

    let coverage = result.get_float("mask_coverage").expect("coverage metadata");
    assert!(coverage > 0.0 && coverage < 1.0);
    Ok(())
}

#[test]
fn test_debug_mode_refuses_non_empty_directory() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("leftover.txt"), "stale")?;

    let result = Pipeline::new().with_debug(dir.path().to_path_buf());
    assert!(result.is_err());
    Ok(())
}
