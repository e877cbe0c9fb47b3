use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{Result, SpecError};
use crate::geometry::{Mesh, Ring};
use crate::operations::boolean::{engine_for, BooleanOutcome, PolygonEngine};
use crate::operations::contour::BuildContours;
use crate::operations::query::{approximate_volume, exact_volume};
use crate::operations::shaping::Extrude;
use crate::tessellation::{FanTriangulator, FlatPolygon, Triangulator};

use super::layers::LayerSource;
use super::spec::{BatchOutcome, ExtrusionSpec, RejectedSpec, SolidResult, VolumeMethod};

/// Runs a batch of extrusion requests against a set of layers.
///
/// Requests are independent: each one either yields its solids or is
/// rejected on its own, and results come back in request order, then
/// contour order, then component order.
pub struct GenerateExtrusion<'a, L: LayerSource + ?Sized> {
    layers: &'a L,
    config: PipelineConfig,
}

impl<'a, L: LayerSource + ?Sized> GenerateExtrusion<'a, L> {
    /// Creates a new `GenerateExtrusion` operation.
    #[must_use]
    pub fn new(layers: &'a L, config: PipelineConfig) -> Self {
        Self { layers, config }
    }

    /// Executes the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidConfig`] if the configuration is invalid.
    /// Problems with individual requests never fail the batch; they are
    /// listed in [`BatchOutcome::rejected`].
    pub fn execute(&self, specs: &[ExtrusionSpec]) -> Result<BatchOutcome> {
        self.config.validate()?;
        Ok(self.run(specs))
    }

    fn run(&self, specs: &[ExtrusionSpec]) -> BatchOutcome {
        let engine = engine_for(&self.config);
        let engine = engine.as_ref();

        let per_spec: Vec<Result<Vec<SolidResult>>> = if self.config.parallel {
            specs.par_iter().map(|spec| self.extrude_spec(engine, spec)).collect()
        } else {
            specs.iter().map(|spec| self.extrude_spec(engine, spec)).collect()
        };

        let mut outcome = BatchOutcome::default();
        for (index, (spec, result)) in specs.iter().zip(per_spec).enumerate() {
            match result {
                Ok(solids) => outcome.geometries.extend(solids),
                Err(e) => {
                    warn!(spec = index, operation = %spec.operation_name, error = %e, "rejected extrusion");
                    outcome.rejected.push(RejectedSpec {
                        index,
                        operation_name: spec.operation_name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        outcome.count = outcome.geometries.len();

        info!(
            specs = specs.len(),
            solids = outcome.count,
            rejected = outcome.rejected.len(),
            "generated extrusions"
        );
        outcome
    }

    /// Runs one request.
    ///
    /// Only request validation fails here; a contour that cannot be
    /// extruded is logged and skipped.
    fn extrude_spec(&self, engine: &dyn PolygonEngine, spec: &ExtrusionSpec) -> Result<Vec<SolidResult>> {
        if !(spec.height.is_finite() && spec.height > 0.0) {
            return Err(SpecError::NonPositiveHeight(spec.height).into());
        }
        if !spec.z_offset.is_finite() {
            return Err(SpecError::NonFiniteOffset(spec.z_offset).into());
        }
        let curves = self
            .layers
            .curves(&spec.contour_layer)
            .ok_or_else(|| SpecError::UnknownLayer(spec.contour_layer.clone()))?;

        let builder = BuildContours::new(&self.config);
        let exteriors = builder.execute(&curves);
        let cuts = self.cut_rings(&builder, spec);

        let mut solids = Vec::new();
        for (contour_index, exterior) in exteriors.iter().enumerate() {
            match extrude_contour(engine, exterior, &cuts, spec, contour_index) {
                Ok(mut contour_solids) => solids.append(&mut contour_solids),
                Err(e) => warn!(
                    layer = %spec.contour_layer,
                    contour = contour_index,
                    error = %e,
                    "dropping contour"
                ),
            }
        }

        debug!(
            layer = %spec.contour_layer,
            contours = exteriors.len(),
            cuts = cuts.len(),
            solids = solids.len(),
            "extruded layer"
        );
        Ok(solids)
    }

    fn cut_rings(&self, builder: &BuildContours, spec: &ExtrusionSpec) -> Vec<Ring> {
        let Some(layer) = spec.cut_layer.as_deref().filter(|l| !l.is_empty()) else {
            return Vec::new();
        };
        if let Some(curves) = self.layers.curves(layer) {
            builder.execute(&curves)
        } else {
            warn!(layer, "cut layer not found, extruding without cuts");
            Vec::new()
        }
    }
}

/// Extrudes every component left of one exterior contour.
fn extrude_contour(
    engine: &dyn PolygonEngine,
    exterior: &Ring,
    cuts: &[Ring],
    spec: &ExtrusionSpec,
    contour_index: usize,
) -> Result<Vec<SolidResult>> {
    match engine.subtract(exterior, cuts) {
        BooleanOutcome::Exact(polygons) => {
            if polygons.is_empty() {
                debug!(contour = contour_index, "cuts remove the whole contour");
            }
            polygons
                .iter()
                .enumerate()
                .map(|(component_index, polygon)| {
                    let mesh = cap_and_extrude(engine, FlatPolygon::from_polygon(polygon), spec)?;
                    let volume = exact_volume(polygon, spec.height);
                    Ok(SolidResult::new(spec, contour_index, component_index, volume, VolumeMethod::Exact, mesh))
                })
                .collect()
        }
        BooleanOutcome::Approximate {
            exterior,
            effective_area,
        } => {
            let mesh = cap_and_extrude(engine, FlatPolygon::from_exterior(&exterior), spec)?;
            let volume = approximate_volume(effective_area, spec.height);
            Ok(vec![SolidResult::new(
                spec,
                contour_index,
                0,
                volume,
                VolumeMethod::Approximate,
                mesh,
            )])
        }
    }
}

/// Triangulates the caps with the engine's triangulator, falling back to a
/// fan over the exterior ring alone, then extrudes.
fn cap_and_extrude(engine: &dyn PolygonEngine, flat: FlatPolygon, spec: &ExtrusionSpec) -> Result<Mesh> {
    let (flat, cap) = match engine.cap_triangulator().triangulate(&flat) {
        Ok(cap) => (flat, cap),
        Err(e) => {
            warn!(
                points = flat.len(),
                holes = flat.hole_count(),
                error = %e,
                "cap triangulation failed, using exterior fan"
            );
            let exterior = flat.exterior().to_vec();
            let len = exterior.len();
            let exterior = FlatPolygon::new(exterior, vec![len])?;
            let cap = FanTriangulator.triangulate(&exterior)?;
            (exterior, cap)
        }
    };
    debug!(points = flat.len(), triangles = cap.len(), "triangulated cap");
    Extrude::new(spec.z_offset, spec.height).execute(&flat, &cap)
}

/// Runs a batch with the default configuration.
#[must_use]
pub fn generate_extrusions<L: LayerSource + ?Sized>(layers: &L, specs: &[ExtrusionSpec]) -> BatchOutcome {
    GenerateExtrusion::new(layers, PipelineConfig::default()).run(specs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ExtrudoError;
    use crate::geometry::RawCurve;
    use crate::pipeline::InMemoryLayers;

    fn square(min: f64, max: f64) -> RawCurve {
        RawCurve::polyline(&[(min, min), (max, min), (max, max), (min, max)], true)
    }

    fn layers() -> InMemoryLayers {
        InMemoryLayers::new()
            .with_layer("outline", vec![square(0.0, 10.0)])
            .with_layer("holes", vec![square(4.0, 6.0)])
    }

    #[test]
    fn square_with_hole_from_layers() {
        let spec = ExtrusionSpec::new("outline").with_cut_layer("holes").with_height(2.0);
        let outcome = generate_extrusions(&layers(), &[spec]);
        assert_eq!(outcome.count, 1);
        let solid = &outcome.geometries[0];
        assert_relative_eq!(solid.volume, 192.0, epsilon = 1e-9);
        assert_eq!(solid.vertex_count, 16);
        assert_eq!(solid.face_count, 24);
        assert_eq!(solid.volume_method, VolumeMethod::Exact);
    }

    #[test]
    fn missing_cut_layer_means_no_cuts() {
        let spec = ExtrusionSpec::new("outline").with_cut_layer("nowhere").with_height(1.0);
        let outcome = generate_extrusions(&layers(), &[spec]);
        assert_eq!(outcome.count, 1);
        assert_relative_eq!(outcome.geometries[0].volume, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_cut_layer_name_is_ignored() {
        let spec = ExtrusionSpec::new("outline").with_cut_layer("").with_height(1.0);
        let outcome = generate_extrusions(&layers(), &[spec]);
        assert_eq!(outcome.count, 1);
    }

    #[test]
    fn bad_height_rejects_only_that_spec() {
        let specs = [
            ExtrusionSpec::new("outline").with_height(0.0),
            ExtrusionSpec::new("outline").with_height(1.0),
        ];
        let outcome = generate_extrusions(&layers(), &specs);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].index, 0);
    }

    #[test]
    fn invalid_config_fails_the_batch() {
        let config = PipelineConfig::default().with_circle_segments(2);
        let err = GenerateExtrusion::new(&layers(), config).execute(&[]).unwrap_err();
        assert!(matches!(err, ExtrudoError::Spec(SpecError::InvalidConfig(_))));
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let specs: Vec<_> = (1..=8)
            .map(|i| ExtrusionSpec::new("outline").with_cut_layer("holes").with_height(f64::from(i)))
            .collect();
        let layers = layers();
        let parallel = GenerateExtrusion::new(&layers, PipelineConfig::default()).execute(&specs).unwrap();
        let sequential = GenerateExtrusion::new(&layers, PipelineConfig::default().with_parallel(false))
            .execute(&specs)
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    struct BrokenTriangulator;

    impl Triangulator for BrokenTriangulator {
        fn triangulate(&self, _polygon: &FlatPolygon) -> Result<Vec<[u32; 3]>> {
            Err(crate::error::TriangulationError::NoEar { remaining: 0 }.into())
        }
    }

    struct HoleEngine;

    impl PolygonEngine for HoleEngine {
        fn subtract(&self, exterior: &Ring, cuts: &[Ring]) -> BooleanOutcome {
            BooleanOutcome::Exact(vec![crate::geometry::PolygonWithHoles::new(exterior.clone(), cuts.to_vec())])
        }

        fn cap_triangulator(&self) -> &dyn Triangulator {
            &BrokenTriangulator
        }
    }

    #[test]
    fn failed_cap_falls_back_to_exterior_fan() {
        let exterior = Ring::from_coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap();
        let hole = Ring::from_coords(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]).unwrap();
        let spec = ExtrusionSpec::new("outline").with_height(2.0);
        let solids = extrude_contour(&HoleEngine, &exterior, &[hole], &spec, 0).unwrap();
        assert_eq!(solids.len(), 1);
        assert_eq!(solids[0].vertex_count, 8);
        assert_eq!(solids[0].face_count, 12);
        assert_relative_eq!(solids[0].volume, 192.0, epsilon = 1e-9);
    }
}
