use anyhow::Result;
use image::DynamicImage;

use crate::detection::{preprocessing, segmentation};
use crate::models::SegmentationColor;
use crate::pipeline::{MetadataValue, PipelineContext, PipelineData, PipelineStep};

/// Threshold the frame against the HSV band; output is the cleaned binary
/// mask. Records the foreground coverage as metadata.
pub struct HsvMaskStep {
    pub color: SegmentationColor,
    pub dilation_size: u32,
}

impl PipelineStep for HsvMaskStep {
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData> {
        let rgb = data.original.to_rgb8();
        let mask = segmentation::hsv_mask(&rgb, &self.color);
        let mask = segmentation::clean_mask(&mask, self.dilation_size);

        let foreground = mask.pixels().filter(|p| p[0] > 0).count();
        let coverage = foreground as f32 / (mask.width() * mask.height()) as f32;
        if context.verbose {
            println!("  Mask covers {:.1}% of the frame", coverage * 100.0);
        }

        Ok(PipelineData {
            image: DynamicImage::ImageLuma8(mask),
            original: data.original,
            metadata: data.metadata,
        }
        .with_metadata("mask_coverage", MetadataValue::Float(coverage)))
    }

    fn name(&self) -> &str {
        "HSV Mask"
    }
}

/// Apply the mask from the previous stage to the original frame.
pub struct ApplyMaskStep;

impl PipelineStep for ApplyMaskStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let rgb = data.original.to_rgb8();
        let mask = data.image.to_luma8();
        let masked = preprocessing::apply_mask(&rgb, &mask);
        Ok(PipelineData {
            image: DynamicImage::ImageRgb8(masked),
            original: data.original,
            metadata: data.metadata,
        })
    }

    fn name(&self) -> &str {
        "Apply Mask"
    }
}

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let gray = preprocessing::to_grayscale(&data.image.to_rgb8());
        Ok(PipelineData {
            image: DynamicImage::ImageLuma8(gray),
            original: data.original,
            metadata: data.metadata,
        })
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub kernel: u32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let gray = data.image.to_luma8();
        let blurred = preprocessing::apply_blur(&gray, self.kernel);
        Ok(PipelineData {
            image: DynamicImage::ImageLuma8(blurred),
            original: data.original,
            metadata: data.metadata,
        })
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Binarize with the fixed intensity threshold
pub struct ThresholdStep {
    pub intensity: u8,
}

impl PipelineStep for ThresholdStep {
    fn process(&self, data: PipelineData, _context: &PipelineContext) -> Result<PipelineData> {
        let gray = data.image.to_luma8();
        let binary = preprocessing::binarize(&gray, self.intensity);
        Ok(PipelineData {
            image: DynamicImage::ImageLuma8(binary),
            original: data.original,
            metadata: data.metadata,
        })
    }

    fn name(&self) -> &str {
        "Intensity Threshold"
    }
}
