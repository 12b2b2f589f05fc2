//! Swiss Confederation WMTS, path-templated with a version segment.
//! <https://api3.geo.admin.ch/services/sdiservices.html#wmts>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 19;
const TILE_SIZE: u32 = 256;

fn swisstopo_layer(title: &str, name: &'static str, format: ImageFormat) -> Layer {
    Layer::new(
        title,
        name,
        format,
        Box::new(move |tile| {
            format!(
                "https://wmts.geo.admin.ch/1.0.0/{}/default/current/3857/{}/{}/{}.{}",
                name,
                tile.zoom,
                tile.x,
                tile.y,
                match format {
                    ImageFormat::Jpeg => "jpeg",
                    ImageFormat::Png => "png",
                }
            )
        }),
    )
}

pub fn swisstopo() -> Provider {
    Provider::new(
        "swisstopo",
        "Swiss Confederation",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(swisstopo_layer(
        "Map",
        "ch.swisstopo.pixelkarte-farbe",
        ImageFormat::Jpeg,
    ))
    .add_layer(swisstopo_layer(
        "Orthophoto",
        "ch.swisstopo.swissimage",
        ImageFormat::Jpeg,
    ))
    .add_layer(swisstopo_layer(
        "Grey Map",
        "ch.swisstopo.pixelkarte-grau",
        ImageFormat::Jpeg,
    ))
}
