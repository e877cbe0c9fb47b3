use thiserror::Error;

/// Top-level error type for the extrusion pipeline.
///
/// Every stage reports through one of the family enums below. The pipeline
/// recovers from all of them locally except [`SpecError`], which rejects the
/// single extrusion request that caused it.
#[derive(Debug, Error)]
pub enum ExtrudoError {
    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Boolean(#[from] BooleanError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised while turning a raw curve into a closed ring.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error("ring needs at least 3 distinct points, found {found}")]
    TooFewPoints { found: usize },

    #[error("curve is open: end point is {gap} away from start point")]
    OpenCurve { gap: f64 },

    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("ring encloses no area")]
    ZeroArea,
}

/// Errors raised by the polygon difference step.
#[derive(Debug, Error)]
pub enum BooleanError {
    #[error("invalid ring for boolean operation: {0}")]
    InvalidRing(String),

    #[error("ring self-intersects at edges {first} and {second}")]
    SelfIntersection { first: usize, second: usize },
}

/// Errors raised while triangulating a cap.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("degenerate ring: {0}")]
    DegenerateRing(String),

    #[error("no ear found with {remaining} vertices left")]
    NoEar { remaining: usize },

    #[error("no bridge from hole {hole} to the outer ring")]
    NoHoleBridge { hole: usize },

    #[error("constrained triangulation failed: {0}")]
    Constraint(String),
}

/// Validation failures for one extrusion request.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("height must be a positive finite number, got {0}")]
    NonPositiveHeight(f64),

    #[error("z offset must be finite, got {0}")]
    NonFiniteOffset(f64),

    #[error("contour layer {0:?} not found")]
    UnknownLayer(String),

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

/// Errors for coordinates or indices the pipeline cannot work with.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: u32, len: usize },
}

/// Convenience type alias for results using [`ExtrudoError`].
pub type Result<T> = std::result::Result<T, ExtrudoError>;
