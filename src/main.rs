use clap::{Parser, ValueEnum};
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::PathBuf;
use std::sync::Arc;

use fingertips::detection::steps::{
    ApplyMaskStep, BlurStep, GrayscaleStep, HsvMaskStep, ThresholdStep,
};
use fingertips::{Detection, FingerDetector, Pipeline, SegmentationColor};

/// Stored threshold presets from hand calibration sessions.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Bare hand skin tone
    Skin,
    /// Red glove
    Glove,
}

#[derive(Parser)]
#[command(name = "fingertips")]
#[command(about = "Detect fingertip positions in a color image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Color preset to start from
    #[arg(long, value_enum, default_value_t = Preset::Skin)]
    preset: Preset,

    /// Target hue in degrees (0-360), overrides the preset
    #[arg(long)]
    hue: Option<f32>,

    /// Target saturation in percent (0-100), overrides the preset
    #[arg(long)]
    saturation: Option<f32>,

    /// Target value in percent (0-100), overrides the preset
    #[arg(long)]
    value: Option<f32>,

    /// Hue tolerance in degrees, overrides the preset
    #[arg(long)]
    hue_tolerance: Option<f32>,

    /// Saturation tolerance in percent, overrides the preset
    #[arg(long)]
    saturation_tolerance: Option<f32>,

    /// Value tolerance in percent, overrides the preset
    #[arg(long)]
    value_tolerance: Option<f32>,

    /// Binarization intensity threshold
    #[arg(long, default_value_t = 30)]
    threshold: u8,

    /// Pixels to shift each tip toward the finger interior (0-60)
    #[arg(long, default_value_t = 12.0)]
    correction_scale: f32,

    /// Save an annotated copy of the input image to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save intermediate mask stages to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

impl Cli {
    /// Resolve the preset plus per-field overrides into a segmentation
    /// color, converting from user scales to the engine's native ranges.
    fn segmentation_color(&self) -> SegmentationColor {
        let (h, s, v, th, ts, tv) = match self.preset {
            Preset::Skin => (20.0, 36.0, 62.0, 20.0, 24.0, 38.0),
            Preset::Glove => (0.0, 60.0, 60.0, 20.0, 40.0, 40.0),
        };
        SegmentationColor::from_user(
            self.hue.unwrap_or(h),
            self.saturation.unwrap_or(s),
            self.value.unwrap_or(v),
            self.hue_tolerance.unwrap_or(th),
            self.saturation_tolerance.unwrap_or(ts),
            self.value_tolerance.unwrap_or(tv),
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.verbose {
        println!("Loading image: {:?}", args.image_path);
    }

    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    let color = args.segmentation_color();

    // Dump the intermediate mask stages when requested; useful for tuning
    // the HSV band against a new glove or lighting setup.
    if let Some(debug_dir) = &args.debug_out {
        let pipeline = Pipeline::new()
            .with_verbose(args.verbose)
            .add_step(Arc::new(HsvMaskStep {
                color,
                dilation_size: 5,
            }))
            .add_step(Arc::new(ApplyMaskStep))
            .add_step(Arc::new(GrayscaleStep))
            .add_step(Arc::new(BlurStep { kernel: 7 }))
            .add_step(Arc::new(ThresholdStep {
                intensity: args.threshold,
            }))
            .with_debug(debug_dir.clone())?;
        pipeline.run(img.clone())?;
    }

    let detector = FingerDetector::new()
        .with_verbose(args.verbose)
        .with_intensity_threshold(args.threshold)
        .with_correction_scale(args.correction_scale);

    let detection = detector.detect(&img, &color)?;

    println!("Detected {} fingertips", detection.fingertips.len());
    for (i, tip) in detection.fingertips.iter().enumerate() {
        println!("  Tip {} at ({}, {})", i + 1, tip.x, tip.y);
    }

    if let Some(output_path) = &args.output {
        let annotated = annotate(&img, &detection);
        annotated
            .save(output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;
        if args.verbose {
            println!("Annotated image saved to {:?}", output_path);
        }
    }

    Ok(())
}

/// Draw the active contour and fingertip markers onto a copy of the frame.
fn annotate(img: &DynamicImage, detection: &Detection) -> RgbImage {
    let mut canvas = img.to_rgb8();

    let points = &detection.contour.points;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            &mut canvas,
            (p.x as f32, p.y as f32),
            (q.x as f32, q.y as f32),
            Rgb([0, 255, 0]),
        );
    }

    for tip in &detection.fingertips {
        draw_hollow_circle_mut(&mut canvas, (tip.x, tip.y), 8, Rgb([255, 0, 0]));
    }

    canvas
}
