use std::collections::BTreeMap;

use crate::geometry::RawCurve;

/// Supplies the planar curves found on a named layer.
pub trait LayerSource: Sync {
    /// Returns the layer's curves in document order, or `None` if no layer
    /// has this name.
    fn curves(&self, layer: &str) -> Option<Vec<RawCurve>>;
}

/// Layers held in memory, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryLayers {
    layers: BTreeMap<String, Vec<RawCurve>>,
}

impl InMemoryLayers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer, replacing any layer with the same name.
    #[must_use]
    pub fn with_layer(mut self, name: impl Into<String>, curves: Vec<RawCurve>) -> Self {
        self.insert(name, curves);
        self
    }

    /// Adds a layer, returning the curves it replaced.
    pub fn insert(&mut self, name: impl Into<String>, curves: Vec<RawCurve>) -> Option<Vec<RawCurve>> {
        self.layers.insert(name.into(), curves)
    }

    /// Layer names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }
}

impl LayerSource for InMemoryLayers {
    fn curves(&self, layer: &str) -> Option<Vec<RawCurve>> {
        self.layers.get(layer).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_layer_is_none() {
        let layers = InMemoryLayers::new().with_layer("walls", vec![RawCurve::circle(0.0, 0.0, 1.0)]);
        assert_eq!(layers.curves("walls").map(|c| c.len()), Some(1));
        assert!(layers.curves("doors").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let layers = InMemoryLayers::new()
            .with_layer("b", Vec::new())
            .with_layer("a", Vec::new());
        assert_eq!(layers.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
