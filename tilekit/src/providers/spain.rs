//! Spanish IGN, a query-string WMTS with lowercase parameter names and a
//! per-layer service path. <https://www.ign.es/web/ign/portal>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

fn wmts_layer(title: &str, name: &'static str, service: &'static str, format: ImageFormat) -> Layer {
    Layer::new(
        title,
        name,
        format,
        Box::new(move |tile| {
            format!(
                "https://www.ign.es/wmts/{service}?\
                 service=WMTS&request=GetTile&version=1.0.0&layer={name}\
                 &tilematrix={}&tilematrixset=EPSG:3857&tilerow={}&tilecol={}\
                 &format={}&style=default",
                tile.zoom,
                tile.y,
                tile.x,
                format.mime()
            )
        }),
    )
}

pub fn spain() -> Provider {
    Provider::new(
        "spain",
        "Spain",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(wmts_layer("Map", "IGNBaseTodo", "ign-base", ImageFormat::Jpeg))
    .add_layer(wmts_layer(
        "Orthoimage",
        "OI.OrthoimageCoverage",
        "pnoa-ma",
        ImageFormat::Jpeg,
    ))
}
