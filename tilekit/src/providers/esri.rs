//! Esri ArcGIS Online, a query-string WMTS with capitalised parameter
//! names. <https://server.arcgisonline.com/arcgis/rest/services>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

pub fn esri() -> Provider {
    Provider::new(
        "esri",
        "Esri",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(Layer::new(
        "World Topo Map",
        "world_topo_map",
        ImageFormat::Jpeg,
        Box::new(|tile| {
            format!(
                "https://server.arcgisonline.com/arcgis/rest/services/World_Topo_Map/MapServer/WMTS?\
                 layer=World_Topo_Map&style=default&tilematrixset=GoogleMapsCompatible\
                 &Service=WMTS&Request=GetTile&Version=1.0.0&Format=image/jpeg\
                 &TileMatrix={}&TileCol={}&TileRow={}",
                tile.zoom, tile.x, tile.y
            )
        }),
    ))
}
