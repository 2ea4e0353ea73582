pub mod detection;
pub mod disjoint_set;
pub mod models;
pub mod pipeline;

pub use detection::FingerDetector;
pub use disjoint_set::DisjointSet;
pub use models::{Contour, ConvexityDefect, Detection, Fingertip, SegmentationColor};
pub use pipeline::{
    DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineStep,
};
