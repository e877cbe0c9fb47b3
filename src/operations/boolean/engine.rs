use tracing::warn;

use crate::config::{EngineKind, PipelineConfig};
use crate::geometry::{PolygonWithHoles, Ring};
use crate::tessellation::{triangulator_for, FanTriangulator, Triangulator};

use super::subtract::Subtract;

/// Result of subtracting the cut region from one exterior ring.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanOutcome {
    /// The true difference: zero or more disjoint polygons with holes.
    Exact(Vec<PolygonWithHoles>),
    /// The raw exterior, extruded as-is, with the cut area subtracted only
    /// from the reported volume.
    Approximate {
        exterior: Ring,
        effective_area: f64,
    },
}

/// Strategy for the polygon difference step, with the cap triangulator that
/// belongs to it.
pub trait PolygonEngine: Send + Sync {
    /// Subtracts every cut ring from `exterior`.
    fn subtract(&self, exterior: &Ring, cuts: &[Ring]) -> BooleanOutcome;

    /// Triangulator used for the caps of this engine's output.
    fn cap_triangulator(&self) -> &dyn Triangulator;
}

/// Area left after subtracting every cut independently, clamped at zero.
///
/// Overlapping cuts, or cuts reaching outside the exterior, are subtracted
/// more than once.
#[must_use]
pub fn approximate_area(exterior: &Ring, cuts: &[Ring]) -> f64 {
    let cut_area: f64 = cuts.iter().map(Ring::area).sum();
    (exterior.area() - cut_area).max(0.0)
}

/// Exact difference through `geo`, falling back to the approximate outcome
/// when the input rings are invalid.
pub struct ExactPolygonEngine {
    triangulator: Box<dyn Triangulator>,
}

impl ExactPolygonEngine {
    /// Creates an exact engine with the given cap triangulator.
    #[must_use]
    pub fn new(triangulator: Box<dyn Triangulator>) -> Self {
        Self { triangulator }
    }
}

impl PolygonEngine for ExactPolygonEngine {
    fn subtract(&self, exterior: &Ring, cuts: &[Ring]) -> BooleanOutcome {
        match Subtract::new(exterior, cuts).execute() {
            Ok(polygons) => BooleanOutcome::Exact(polygons),
            Err(e) => {
                warn!(error = %e, cuts = cuts.len(), "boolean difference failed, using approximate volume");
                BooleanOutcome::Approximate {
                    exterior: exterior.clone(),
                    effective_area: approximate_area(exterior, cuts),
                }
            }
        }
    }

    fn cap_triangulator(&self) -> &dyn Triangulator {
        self.triangulator.as_ref()
    }
}

/// Never computes a difference: extrudes the raw exterior with fan caps and
/// reports the approximate volume.
#[derive(Debug, Default)]
pub struct ApproximateFanEngine {
    fan: FanTriangulator,
}

impl ApproximateFanEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PolygonEngine for ApproximateFanEngine {
    fn subtract(&self, exterior: &Ring, cuts: &[Ring]) -> BooleanOutcome {
        BooleanOutcome::Approximate {
            exterior: exterior.clone(),
            effective_area: approximate_area(exterior, cuts),
        }
    }

    fn cap_triangulator(&self) -> &dyn Triangulator {
        &self.fan
    }
}

/// Builds the engine selected by `config`.
#[must_use]
pub fn engine_for(config: &PipelineConfig) -> Box<dyn PolygonEngine> {
    match config.engine {
        EngineKind::Exact => Box::new(ExactPolygonEngine::new(triangulator_for(config.triangulator))),
        EngineKind::ApproximateFan => Box::new(ApproximateFanEngine::new()),
    }
}
