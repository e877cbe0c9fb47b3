mod mesh;
mod raw_curve;
mod ring;

pub use mesh::Mesh;
pub use raw_curve::{CurvePath, RawCurve, CIRCLE_SEGMENTS};
pub use ring::{PolygonWithHoles, Ring};
