//! Batch extrusion of layer contours into closed meshes.

mod generate;
mod layers;
mod spec;

pub use generate::{generate_extrusions, GenerateExtrusion};
pub use layers::{InMemoryLayers, LayerSource};
pub use spec::{BatchOutcome, ExtrusionSpec, RejectedSpec, SolidResult, VolumeMethod};
