pub mod passes;
pub mod pipeline;

pub use passes::{dedup, remap, trim_text_fields};
pub use pipeline::{
    DedupStep, PipelineState, RemapStep, TransformPipeline, TransformStep, TrimStep,
};
