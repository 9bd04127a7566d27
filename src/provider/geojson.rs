//! In-memory GeoJSON object provider.
//!
//! Loads a GeoJSON feature collection once at startup and answers tile
//! queries with a bounding-box filter. The extra key selects a layer: it is
//! matched against each feature's `layer` property, and an empty key matches
//! every feature.
//!
//! This is the reference provider wired up by the `tilepaint` binary; real
//! deployments implement [`ObjectProvider`](super::ObjectProvider) against
//! their own stores.

use std::sync::Arc;

use async_trait::async_trait;
use geo::{BoundingRect, Geometry, Intersects, Rect};
use serde_json::Value;
use tracing::debug;

use crate::error::ProviderError;

use super::{ObjectProvider, RenderableObject};

/// A single GeoJSON feature with its geometry and properties.
#[derive(Debug, Clone)]
pub struct GeoJsonFeature {
    geometry: Geometry<f64>,
    properties: serde_json::Map<String, Value>,
}

impl GeoJsonFeature {
    /// Create a feature from a geometry and a property map.
    pub fn new(geometry: Geometry<f64>, properties: serde_json::Map<String, Value>) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Look up a property value by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// The feature's `layer` property, if any.
    pub fn layer(&self) -> Option<&str> {
        self.properties.get("layer").and_then(Value::as_str)
    }
}

impl RenderableObject for GeoJsonFeature {
    fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }
}

/// Provider serving features from a GeoJSON document held in memory.
pub struct GeoJsonProvider {
    /// Features paired with their precomputed bounding boxes.
    features: Vec<(Arc<GeoJsonFeature>, Rect<f64>)>,
}

impl GeoJsonProvider {
    /// Parse a GeoJSON document.
    ///
    /// Accepts a `FeatureCollection`, a single `Feature`, or a bare
    /// `Geometry`. Features without geometry are skipped.
    pub fn from_str(text: &str) -> Result<Self, ProviderError> {
        let geojson: geojson::GeoJson = text
            .parse()
            .map_err(|e| ProviderError::Query(format!("invalid GeoJSON: {e}")))?;

        let features = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc.features,
            geojson::GeoJson::Feature(f) => vec![f],
            geojson::GeoJson::Geometry(g) => vec![geojson::Feature {
                bbox: None,
                geometry: Some(g),
                id: None,
                properties: None,
                foreign_members: None,
            }],
        };

        let mut loaded = Vec::with_capacity(features.len());
        for feature in features {
            let Some(geom) = feature.geometry else {
                continue;
            };
            let geometry = Geometry::<f64>::try_from(geom.value)
                .map_err(|e| ProviderError::Query(format!("unsupported geometry: {e}")))?;
            let Some(bbox) = geometry.bounding_rect() else {
                // Empty geometry (e.g. an empty MultiPolygon) can never match
                // a tile envelope.
                continue;
            };
            let properties = feature.properties.unwrap_or_default();
            loaded.push((Arc::new(GeoJsonFeature::new(geometry, properties)), bbox));
        }

        debug!(features = loaded.len(), "loaded GeoJSON data set");
        Ok(Self { features: loaded })
    }

    /// Build a provider directly from already constructed features.
    ///
    /// Features with empty geometry are skipped, matching [`Self::from_str`].
    pub fn from_features(features: Vec<GeoJsonFeature>) -> Self {
        let features = features
            .into_iter()
            .filter_map(|feature| {
                let bbox = feature.geometry.bounding_rect()?;
                Some((Arc::new(feature), bbox))
            })
            .collect();
        Self { features }
    }

    /// Load a GeoJSON document from a file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_str(&text)
    }

    /// Number of loaded features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the data set is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[async_trait]
impl ObjectProvider for GeoJsonProvider {
    type Object = Arc<GeoJsonFeature>;
    type Key = String;

    async fn get_objects(
        &self,
        _zoom: u8,
        envelope: Rect<f64>,
        key: &String,
    ) -> Result<Vec<Arc<GeoJsonFeature>>, ProviderError> {
        let matches = self
            .features
            .iter()
            .filter(|(feature, bbox)| {
                (key.is_empty() || feature.layer() == Some(key.as_str()))
                    && bbox.intersects(&envelope)
            })
            .map(|(feature, _)| Arc::clone(feature))
            .collect();
        Ok(matches)
    }
}

// =============================================================================
// Tests
// =============================================================================
