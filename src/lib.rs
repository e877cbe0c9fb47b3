pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod tessellation;

pub use config::{EngineKind, PipelineConfig, TriangulatorKind};
pub use error::{ExtrudoError, Result};
pub use pipeline::{generate_extrusions, BatchOutcome, ExtrusionSpec, GenerateExtrusion, InMemoryLayers, LayerSource, SolidResult};
