//! OpenStreetMap and Thunderforest slippy-map layers.
//! <https://www.openstreetmap.org/about>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::{TileId, TileMatrixSet};

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

/// Classic `{base}/{z}/{x}/{y}.{ext}` tile path.
fn slippy_url(base: &str, format: ImageFormat, tile: TileId) -> String {
    format!(
        "https://{}/{}/{}/{}.{}",
        base,
        tile.zoom,
        tile.x,
        tile.y,
        format.extension()
    )
}

fn slippy_layer(title: &str, name: &str, format: ImageFormat, base: &'static str) -> Layer {
    Layer::new(
        title,
        name,
        format,
        Box::new(move |tile| slippy_url(base, format, tile)),
    )
}

pub fn openstreetmap() -> Provider {
    Provider::new(
        "openstreetmap",
        "Open Street Map",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(slippy_layer(
        "Map",
        "map",
        ImageFormat::Png,
        "tile.openstreetmap.org",
    ))
    .add_layer(slippy_layer(
        "Cycle",
        "cycle",
        ImageFormat::Png,
        "a.tile.thunderforest.com/cycle",
    ))
    .add_layer(slippy_layer(
        "Transport",
        "transport",
        ImageFormat::Png,
        "a.tile.thunderforest.com/transport",
    ))
    .add_layer(slippy_layer(
        "Landscape",
        "landscape",
        ImageFormat::Png,
        "a.tile.thunderforest.com/landscape",
    ))
    .add_layer(slippy_layer(
        "Outdoors",
        "outdoors",
        ImageFormat::Png,
        "a.tile.thunderforest.com/outdoors",
    ))
}
