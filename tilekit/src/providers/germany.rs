//! German WebAtlasDE, a path-templated WMTS of the federal geodata
//! center. <https://gdz.bkg.bund.de/>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

pub fn germany() -> Provider {
    Provider::new(
        "germany",
        "Germany",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(Layer::new(
        "Map",
        "webatlasde",
        ImageFormat::Png,
        Box::new(|tile| {
            format!(
                "https://sg.geodatenzentrum.de/wmts_webatlasde/tile/1.0.0/\
                 webatlasde/default/DE_EPSG_25832_ADV/{}/{}/{}.png",
                tile.zoom, tile.x, tile.y
            )
        }),
    ))
}
