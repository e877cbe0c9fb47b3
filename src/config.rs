//! Pipeline configuration.
//!
//! [`PipelineConfig`] fixes, ahead of time, which polygon engine and which
//! cap triangulator a run uses, together with the contour extraction
//! tolerances. Nothing is detected at runtime, so two runs with the same
//! configuration and input produce the same meshes.
//!
//! # Presets
//!
//! - [`PipelineConfig::exact()`] - exact polygon difference with ear clipping (the default)
//! - [`PipelineConfig::approximate()`] - no polygon difference; fan caps and summed cut areas
//!
//! # Example
//!
//! ```
//! use extrudo::config::{PipelineConfig, TriangulatorKind};
//!
//! let config = PipelineConfig::exact()
//!     .with_triangulator(TriangulatorKind::ConstrainedDelaunay)
//!     .with_parallel(false);
//! assert!(!config.parallel);
//! ```

use serde::Deserialize;

use crate::error::{Result, SpecError};
use crate::geometry::CIRCLE_SEGMENTS;
use crate::math::CLOSE_EPSILON;

/// How cut contours are removed from an exterior contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Exact polygon difference. Falls back to the approximate path only when
    /// the input rings are invalid.
    #[default]
    Exact,

    /// Keeps the exterior as-is, caps it with a fan and subtracts the summed
    /// cut areas from the volume. Overlapping cuts are subtracted twice.
    ApproximateFan,
}

/// Which algorithm triangulates the caps on the exact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangulatorKind {
    /// Ear clipping with hole bridging.
    #[default]
    EarClipping,

    /// Constrained Delaunay triangulation of the ring edges.
    ConstrainedDelaunay,
}

/// Configuration for extrusion batches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Polygon engine selection.
    pub engine: EngineKind,

    /// Cap triangulator used by the exact engine.
    pub triangulator: TriangulatorKind,

    /// Number of sides used for circles (at least 3).
    pub circle_segments: usize,

    /// An open curve whose end lies closer than this to its start is closed.
    pub close_epsilon: f64,

    /// Chain open lines, arcs and polylines end-to-end into closed loops
    /// before applying the closing policy.
    pub join_open_segments: bool,

    /// Whether to run batch requests in parallel (via rayon).
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            triangulator: TriangulatorKind::default(),
            circle_segments: CIRCLE_SEGMENTS,
            close_epsilon: CLOSE_EPSILON,
            join_open_segments: false,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    /// Exact polygon difference with ear-clipped caps.
    #[must_use]
    pub fn exact() -> Self {
        Self::default()
    }

    /// Approximate engine: fan caps and summed cut areas.
    #[must_use]
    pub fn approximate() -> Self {
        Self {
            engine: EngineKind::ApproximateFan,
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON document. Missing fields keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the document is not valid JSON or has
    /// fields of the wrong type.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the polygon engine.
    #[must_use]
    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Set the cap triangulator.
    #[must_use]
    pub fn with_triangulator(mut self, triangulator: TriangulatorKind) -> Self {
        self.triangulator = triangulator;
        self
    }

    /// Set the number of circle sides.
    #[must_use]
    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.circle_segments = segments;
        self
    }

    /// Set the closing distance for open curves.
    #[must_use]
    pub fn with_close_epsilon(mut self, epsilon: f64) -> Self {
        self.close_epsilon = epsilon;
        self
    }

    /// Enable or disable chaining of open segments.
    #[must_use]
    pub fn with_join_open_segments(mut self, join: bool) -> Self {
        self.join_open_segments = join;
        self
    }

    /// Enable or disable parallel batch processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if circles would have fewer than 3 sides or the
    /// closing epsilon is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.circle_segments < 3 {
            return Err(SpecError::InvalidConfig(format!(
                "circle_segments must be at least 3, got {}",
                self.circle_segments
            ))
            .into());
        }
        if !self.close_epsilon.is_finite() || self.close_epsilon < 0.0 {
            return Err(SpecError::InvalidConfig(format!(
                "close_epsilon must be a non-negative finite number, got {}",
                self.close_epsilon
            ))
            .into());
        }
        Ok(())
    }
}
