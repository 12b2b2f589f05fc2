//! Pluggable map-tile providers. Make sure you follow terms of usage of
//! the particular provider.
//!
//! A provider is data, not behavior: a name, a [`TileMatrixSet`] and an
//! ordered table of layers whose only logic is turning a [`TileSpec`] into
//! a request URL. This one contract covers the whole zoo of real-world
//! tile APIs: path-templated WMTS, query-string WMTS, and REST orthophoto
//! services alike.

mod basemap;
mod esri;
mod geoportail;
mod germany;
mod openstreetmap;
mod spain;
mod swisstopo;

use std::collections::HashMap;

pub use basemap::basemap;
pub use esri::esri;
pub use geoportail::geoportail;
pub use germany::germany;
pub use openstreetmap::openstreetmap;
pub use spain::spain;
pub use swisstopo::swisstopo;

use crate::error::Error;
use crate::tile_matrix::{TileId, TileMatrixSet};

/// Image format a layer declares for its tiles. The payload itself is
/// opaque to this crate; the format travels along for the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// File extension, as used in path-templated tile URLs.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME subtype, as used in WMTS `FORMAT=` query parameters.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Address of one tile image: which provider, which of its layers, and
/// which tile of the pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileSpec {
    pub provider: String,
    pub map_id: u32,
    pub tile: TileId,
}

impl TileSpec {
    pub fn new(provider: impl Into<String>, map_id: u32, tile: TileId) -> Self {
        Self {
            provider: provider.into(),
            map_id,
            tile,
        }
    }
}

/// Builds the request URL for one tile of one layer.
pub type UrlBuilder = Box<dyn Fn(TileId) -> String + Send + Sync>;

/// One addressable map of a provider.
pub struct Layer {
    map_id: u32,
    title: String,
    name: String,
    format: ImageFormat,
    url_builder: UrlBuilder,
}

impl Layer {
    /// The map id is assigned when the layer is added to a [`Provider`].
    pub fn new(
        title: impl Into<String>,
        name: impl Into<String>,
        format: ImageFormat,
        url_builder: UrlBuilder,
    ) -> Self {
        Self {
            map_id: 0,
            title: title.into(),
            name: name.into(),
            format,
            url_builder,
        }
    }

    /// Identifier of this layer, unique within its provider. Assigned at
    /// registration in insertion order, starting at 1.
    pub fn map_id(&self) -> u32 {
        self.map_id
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Internal name, as the provider's API knows the layer.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Request URL for one tile of this layer.
    pub fn url(&self, tile: TileId) -> String {
        (self.url_builder)(tile)
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("map_id", &self.map_id)
            .field("title", &self.title)
            .field("name", &self.name)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// A named tile service with its pyramid description and layer table.
/// Read-only once registered.
#[derive(Debug)]
pub struct Provider {
    name: String,
    title: String,
    tile_matrix_set: TileMatrixSet,
    layers: Vec<Layer>,
}

impl Provider {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        tile_matrix_set: TileMatrixSet,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            tile_matrix_set,
            layers: Vec::new(),
        }
    }

    /// Stable identifier of the provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tile_matrix_set(&self) -> &TileMatrixSet {
        &self.tile_matrix_set
    }

    /// Append a layer, assigning the next map id.
    pub fn add_layer(mut self, mut layer: Layer) -> Self {
        layer.map_id = self.layers.len() as u32 + 1;
        self.layers.push(layer);
        self
    }

    /// Layers in registration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up a layer by its map id.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownLayer`] when no layer carries this id.
    pub fn layer(&self, map_id: u32) -> Result<&Layer, Error> {
        // Map ids are dense and start at 1, the table itself is the index.
        map_id
            .checked_sub(1)
            .and_then(|index| self.layers.get(index as usize))
            .ok_or_else(|| Error::UnknownLayer {
                provider: self.name.clone(),
                map_id,
            })
    }

    /// Look up a layer by its internal name.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Request URL for the given tile address.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownLayer`] or [`Error::InvalidLevel`] when
    /// the address does not fit this provider's pyramid.
    pub fn tile_url(&self, tile_spec: &TileSpec) -> Result<String, Error> {
        self.tile_matrix_set.grid_size(tile_spec.tile.zoom)?;
        Ok(self.layer(tile_spec.map_id)?.url(tile_spec.tile))
    }
}

/// All known providers, looked up by name. Built at process start and
/// read-only afterwards, so it can be shared freely between threads.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the keyless built-in providers. Providers requiring
    /// an API key (e.g. [`geoportail`]) must be registered explicitly.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(openstreetmap());
        registry.register(basemap());
        registry.register(swisstopo());
        registry.register(esri());
        registry.register(germany());
        registry.register(spain());
        registry
    }

    pub fn register(&mut self, provider: Provider) {
        self.providers.insert(provider.name.clone(), provider);
    }

    /// # Errors
    ///
    /// Fails with [`Error::UnknownProvider`] when nothing is registered
    /// under this name.
    pub fn provider(&self, name: &str) -> Result<&Provider, Error> {
        self.providers
            .get(name)
            .ok_or_else(|| Error::UnknownProvider(name.to_owned()))
    }

    /// Resolve a tile spec to the layer serving it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownProvider`] or [`Error::UnknownLayer`]
    /// on a registry miss.
    pub fn layer(&self, tile_spec: &TileSpec) -> Result<&Layer, Error> {
        self.provider(&tile_spec.provider)?.layer(tile_spec.map_id)
    }

    /// Resolve a tile spec to its request URL and declared image format.
    ///
    /// # Errors
    ///
    /// Fails like [`ProviderRegistry::layer`], plus [`Error::InvalidLevel`]
    /// when the zoom level is outside the provider's pyramid.
    pub fn tile_url(&self, tile_spec: &TileSpec) -> Result<(String, ImageFormat), Error> {
        let provider = self.provider(&tile_spec.provider)?;
        let format = provider.layer(tile_spec.map_id)?.format();
        Ok((provider.tile_url(tile_spec)?, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> TileId {
        TileId {
            x: 33919,
            y: 23327,
            zoom: 16,
        }
    }

    #[test]
    fn map_ids_follow_insertion_order() {
        let provider = openstreetmap();
        let ids: Vec<u32> = provider.layers().iter().map(Layer::map_id).collect();
        assert_eq!(ids, (1..=provider.layers().len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn registry_resolves_a_tile_spec() {
        let registry = ProviderRegistry::with_defaults();
        let spec = TileSpec::new("openstreetmap", 1, tile());

        let (url, format) = registry.tile_url(&spec).unwrap();
        assert_eq!(url, "https://tile.openstreetmap.org/16/33919/23327.png");
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn unknown_provider_and_layer_are_registry_misses() {
        let registry = ProviderRegistry::with_defaults();

        assert_eq!(
            registry.tile_url(&TileSpec::new("atlantis", 1, tile())),
            Err(Error::UnknownProvider("atlantis".to_owned()))
        );
        assert_eq!(
            registry.tile_url(&TileSpec::new("openstreetmap", 99, tile())),
            Err(Error::UnknownLayer {
                provider: "openstreetmap".to_owned(),
                map_id: 99
            })
        );
        assert_eq!(
            registry.tile_url(&TileSpec::new("openstreetmap", 0, tile())),
            Err(Error::UnknownLayer {
                provider: "openstreetmap".to_owned(),
                map_id: 0
            })
        );
    }

    #[test]
    fn zoom_level_outside_the_pyramid_is_rejected() {
        let registry = ProviderRegistry::with_defaults();
        let too_deep = TileSpec::new(
            "openstreetmap",
            1,
            TileId {
                x: 0,
                y: 0,
                zoom: 42,
            },
        );

        assert!(matches!(
            registry.tile_url(&too_deep),
            Err(Error::InvalidLevel { level: 42, .. })
        ));
    }

    #[test]
    fn query_string_wmts_url() {
        let provider = geoportail("THE-KEY");
        let orthophotos = provider.layer_by_name("ORTHOIMAGERY.ORTHOPHOTOS").unwrap();

        assert_eq!(
            orthophotos.url(tile()),
            "https://wxs.ign.fr/THE-KEY/geoportail/wmts?\
             SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0\
             &LAYER=ORTHOIMAGERY.ORTHOPHOTOS&STYLE=normal&FORMAT=image/jpeg\
             &TILEMATRIXSET=PM&TILEMATRIX=16&TILEROW=23327&TILECOL=33919"
        );
    }

    #[test]
    fn lowercase_query_string_wmts_url() {
        let registry = ProviderRegistry::with_defaults();
        let spec = TileSpec::new("spain", 2, tile());

        let (url, format) = registry.tile_url(&spec).unwrap();
        assert_eq!(
            url,
            "https://www.ign.es/wmts/pnoa-ma?\
             service=WMTS&request=GetTile&version=1.0.0&layer=OI.OrthoimageCoverage\
             &tilematrix=16&tilematrixset=EPSG:3857&tilerow=23327&tilecol=33919\
             &format=image/jpeg&style=default"
        );
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn path_templated_wmts_urls() {
        let registry = ProviderRegistry::with_defaults();

        let (url, _) = registry
            .tile_url(&TileSpec::new("germany", 1, tile()))
            .unwrap();
        assert_eq!(
            url,
            "https://sg.geodatenzentrum.de/wmts_webatlasde/tile/1.0.0/\
             webatlasde/default/DE_EPSG_25832_ADV/16/33919/23327.png"
        );

        let (url, _) = registry.tile_url(&TileSpec::new("esri", 1, tile())).unwrap();
        assert_eq!(
            url,
            "https://server.arcgisonline.com/arcgis/rest/services/World_Topo_Map/MapServer/WMTS?\
             layer=World_Topo_Map&style=default&tilematrixset=GoogleMapsCompatible\
             &Service=WMTS&Request=GetTile&Version=1.0.0&Format=image/jpeg\
             &TileMatrix=16&TileCol=33919&TileRow=23327"
        );
    }

    #[test]
    fn layer_lookup_by_name_and_id_agree() {
        let provider = geoportail("KEY");
        let by_name = provider.layer_by_name("TRANSPORTNETWORKS.ROADS").unwrap();
        let by_id = provider.layer(by_name.map_id()).unwrap();
        assert_eq!(by_id.name(), "TRANSPORTNETWORKS.ROADS");
        assert_eq!(by_id.format(), ImageFormat::Png);
    }
}
