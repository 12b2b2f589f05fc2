//! Austrian basemap.at, a path-templated WMTS.
//! <https://basemap.at/standard-karten/>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

fn basemap_layer(title: &str, name: &'static str, format: ImageFormat) -> Layer {
    Layer::new(
        title,
        name,
        format,
        Box::new(move |tile| {
            format!(
                "https://maps.wien.gv.at/basemap/{}/normal/google3857/{}/{}/{}.{}",
                name,
                tile.zoom,
                tile.y,
                tile.x,
                format.extension()
            )
        }),
    )
}

pub fn basemap() -> Provider {
    Provider::new(
        "basemap",
        "Austria Basemap",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(basemap_layer("Map", "geolandbasemap", ImageFormat::Png))
    .add_layer(basemap_layer(
        "Orthophoto",
        "bmaporthofoto30cm",
        ImageFormat::Jpeg,
    ))
    .add_layer(basemap_layer(
        "Grey Map",
        "bmapgrau",
        ImageFormat::Png,
    ))
}
