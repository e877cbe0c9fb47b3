use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::geometry::Mesh;

fn default_operation_name() -> String {
    "Extrusion".into()
}

fn default_operation_color() -> String {
    "#4CAF50".into()
}

fn default_height() -> f64 {
    100.0
}

/// One extrusion request: which layer to extrude, what to cut from it, and
/// where the solid sits along z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionSpec {
    #[serde(default = "default_operation_name")]
    pub operation_name: String,
    #[serde(default = "default_operation_color")]
    pub operation_color: String,
    pub contour_layer: String,
    #[serde(default)]
    pub cut_layer: Option<String>,
    #[serde(default)]
    pub z_offset: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl ExtrusionSpec {
    /// Creates a request for `contour_layer` with the default name, color,
    /// offset and height.
    #[must_use]
    pub fn new(contour_layer: impl Into<String>) -> Self {
        Self {
            operation_name: default_operation_name(),
            operation_color: default_operation_color(),
            contour_layer: contour_layer.into(),
            cut_layer: None,
            z_offset: 0.0,
            height: default_height(),
        }
    }

    #[must_use]
    pub fn with_cut_layer(mut self, cut_layer: impl Into<String>) -> Self {
        self.cut_layer = Some(cut_layer.into());
        self
    }

    #[must_use]
    pub fn with_z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = z_offset;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_operation(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self.operation_color = color.into();
        self
    }
}

/// How a solid's volume was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMethod {
    /// Area of the true polygon difference times height.
    Exact,
    /// Exterior area minus the summed cut areas, times height.
    Approximate,
}

/// One extruded solid.
///
/// A contour whose cuts split it into several pieces yields one result per
/// piece, told apart by `component_index`. Serializes the mesh inline as
/// `vertices: [[x, y, z], ...]` and `faces: [[i, j, k], ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidResult {
    pub operation_name: String,
    pub operation_color: String,
    pub contour_layer: String,
    pub contour_index: usize,
    pub component_index: usize,
    pub cut_layer: Option<String>,
    pub z_offset: f64,
    pub height: f64,
    pub volume: f64,
    pub volume_method: VolumeMethod,
    pub mesh: Mesh,
    pub vertex_count: usize,
    pub face_count: usize,
}

impl SolidResult {
    /// Builds a result for `spec`, filling the counts from `mesh`.
    #[must_use]
    pub fn new(
        spec: &ExtrusionSpec,
        contour_index: usize,
        component_index: usize,
        volume: f64,
        volume_method: VolumeMethod,
        mesh: Mesh,
    ) -> Self {
        Self {
            operation_name: spec.operation_name.clone(),
            operation_color: spec.operation_color.clone(),
            contour_layer: spec.contour_layer.clone(),
            contour_index,
            component_index,
            cut_layer: spec.cut_layer.clone(),
            z_offset: spec.z_offset,
            height: spec.height,
            volume,
            volume_method,
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            mesh,
        }
    }
}

impl Serialize for SolidResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let vertices: Vec<[f64; 3]> = self.mesh.vertices.iter().map(|p| [p.x, p.y, p.z]).collect();
        let mut state = serializer.serialize_struct("SolidResult", 13)?;
        state.serialize_field("operation_name", &self.operation_name)?;
        state.serialize_field("operation_color", &self.operation_color)?;
        state.serialize_field("contour_layer", &self.contour_layer)?;
        state.serialize_field("contour_index", &self.contour_index)?;
        state.serialize_field("component_index", &self.component_index)?;
        state.serialize_field("cut_layer", &self.cut_layer)?;
        state.serialize_field("z_offset", &self.z_offset)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("volume", &self.volume)?;
        state.serialize_field("vertices", &vertices)?;
        state.serialize_field("faces", &self.mesh.faces)?;
        state.serialize_field("vertex_count", &self.vertex_count)?;
        state.serialize_field("face_count", &self.face_count)?;
        state.end()
    }
}

/// A request the batch refused to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedSpec {
    /// Position of the request in the batch.
    pub index: usize,
    pub operation_name: String,
    pub message: String,
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub geometries: Vec<SolidResult>,
    pub count: usize,
    pub rejected: Vec<RejectedSpec>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let spec: ExtrusionSpec = serde_json::from_str(r#"{"contour_layer": "OUTLINE"}"#).unwrap();
        assert_eq!(spec, ExtrusionSpec::new("OUTLINE"));
        assert_eq!(spec.operation_name, "Extrusion");
        assert_eq!(spec.operation_color, "#4CAF50");
        assert!((spec.height - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contour_layer_is_required() {
        assert!(serde_json::from_str::<ExtrusionSpec>(r#"{"height": 5}"#).is_err());
    }

    #[test]
    fn result_serializes_mesh_inline() {
        let mesh = Mesh {
            vertices: vec![
                crate::math::Point3::new(0.0, 0.0, 0.0),
                crate::math::Point3::new(1.0, 0.0, 0.0),
                crate::math::Point3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 2, 1]],
        };
        let spec = ExtrusionSpec::new("A").with_cut_layer("B").with_height(2.0);
        let result = SolidResult::new(&spec, 0, 0, 1.0, VolumeMethod::Exact, mesh);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["vertices"][1], serde_json::json!([1.0, 0.0, 0.0]));
        assert_eq!(json["faces"], serde_json::json!([[0, 2, 1]]));
        assert_eq!(json["cut_layer"], "B");
        assert_eq!(json["vertex_count"], 3);
        assert!(json.get("mesh").is_none());
        assert!(json.get("volume_method").is_none());
    }
}
