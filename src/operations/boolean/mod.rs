mod convert;
mod engine;
mod subtract;
mod union;

pub use convert::{polygons_from_geo, ring_to_geo};
pub use engine::{approximate_area, engine_for, ApproximateFanEngine, BooleanOutcome, ExactPolygonEngine, PolygonEngine};
pub use subtract::Subtract;
pub use union::Union;
