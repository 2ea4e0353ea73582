use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use image::DynamicImage;

/// Data that flows through the pipeline: the current stage's image plus a
/// shared handle on the untouched input frame.
#[derive(Clone)]
pub struct PipelineData {
    /// Output of the most recent stage (mask, grayscale, binary, ...)
    pub image: DynamicImage,

    /// Reference to the original frame (shared efficiently via Arc)
    pub original: Arc<DynamicImage>,

    /// Metadata for tracking stage properties (e.g., "mask_coverage")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone)]
pub enum MetadataValue {
    Float(f32),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a full input frame
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get metadata as float
    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get metadata as int
    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: std::path::PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context available to all pipeline steps
#[derive(Clone)]
pub struct PipelineContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement.
///
/// The mask stages are a strict one-in one-out chain, so a step transforms a
/// single item.
pub trait PipelineStep: Send + Sync {
    /// Process data and return the transformed data
    fn process(&self, data: PipelineData, context: &PipelineContext) -> Result<PipelineData>;

    /// Human-readable name for this step (used in verbose and debug output)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext {
                verbose: false,
                debug: None,
            },
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: std::path::PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<PipelineData> {
        self.save_debug_image(&input, 0, "input")?;

        let mut data = PipelineData::from_image(input);

        for (step_index, step) in self.steps.iter().enumerate() {
            if self.context.verbose {
                println!("Running step: {}", step.name());
            }

            data = step.process(data, &self.context)?;
            self.save_debug_image(&data.image, step_index + 1, step.name())?;
        }

        Ok(data)
    }

    fn save_debug_image(&self, image: &DynamicImage, step_index: usize, step_name: &str) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };
        if !debug_config.enabled {
            return Ok(());
        }

        let dir_name = format!(
            "{:02}_{}",
            step_index,
            step_name.to_lowercase().replace(' ', "_")
        );
        let step_dir = debug_config.output_dir.join(&dir_name);
        std::fs::create_dir_all(&step_dir)?;

        let output_path = step_dir.join("01.png");
        image
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

        if self.context.verbose {
            println!("  Debug: saved {}/01.png", dir_name);
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
