//! Object provider abstraction.
//!
//! The render pipeline does not know where geometry comes from: an
//! [`ObjectProvider`] performs the spatial query for a tile request and
//! returns the objects intersecting the tile's geographic envelope. Providers
//! are responsible for spatial filtering but need not clip geometry precisely
//! to the envelope; the pipeline may further crop.

mod geojson;

pub use geojson::{GeoJsonProvider, GeoJsonFeature};

use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use geo::{Geometry, Rect};

use crate::error::ProviderError;

/// Capability "has a 2D geometry in geographic coordinates".
///
/// The pipeline treats objects opaquely except for this accessor; stylers may
/// downcast or branch on concrete object types to pick styles.
pub trait RenderableObject: Send + Sync {
    /// The object's geometry in WGS84 lng/lat coordinates.
    fn geometry(&self) -> &Geometry<f64>;
}

impl<T: RenderableObject> RenderableObject for Arc<T> {
    fn geometry(&self) -> &Geometry<f64> {
        (**self).geometry()
    }
}

/// Trait for querying renderable objects for a tile envelope.
///
/// This abstraction allows the tile service to work with different geometry
/// backends (in-memory files, databases, remote services) without being tied
/// to a specific implementation.
#[async_trait]
pub trait ObjectProvider: Send + Sync {
    /// The object type this provider returns.
    type Object: RenderableObject + 'static;

    /// Extra cache-key component carried through `get_tile`, e.g. a layer
    /// name or filter set. Must have total, stable value equality.
    type Key: Clone + Eq + Hash + Send + Sync + std::fmt::Debug + 'static;

    /// Query objects intersecting the given WGS84 envelope.
    ///
    /// The returned order is the paint order: the pipeline paints objects
    /// exactly in the order the provider returns them, without re-sorting.
    ///
    /// # Errors
    ///
    /// Data-source errors propagate to the tile service caller uncaught;
    /// an empty result is not an error and yields a blank tile.
    async fn get_objects(
        &self,
        zoom: u8,
        envelope: Rect<f64>,
        key: &Self::Key,
    ) -> Result<Vec<Self::Object>, ProviderError>;
}
