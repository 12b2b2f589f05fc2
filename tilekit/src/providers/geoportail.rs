//! French IGN Geoportail, a query-string WMTS service. Requires an API
//! key. <https://geoservices.ign.fr/documentation/services/api-et-services-ogc>

use super::{ImageFormat, Layer, Provider};
use crate::tile_matrix::TileMatrixSet;

const NUMBER_OF_LEVELS: u8 = 20;
const TILE_SIZE: u32 = 256;

fn wmts_layer(api_key: &str, title: &str, name: &str, format: ImageFormat, style: &str) -> Layer {
    let url_base = format!(
        "https://wxs.ign.fr/{api_key}/geoportail/wmts?\
         SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0\
         &LAYER={name}&STYLE={style}&FORMAT={}\
         &TILEMATRIXSET=PM",
        format.mime()
    );
    Layer::new(
        title,
        name,
        format,
        Box::new(move |tile| {
            format!(
                "{url_base}&TILEMATRIX={}&TILEROW={}&TILECOL={}",
                tile.zoom, tile.y, tile.x
            )
        }),
    )
}

pub fn geoportail(api_key: &str) -> Provider {
    Provider::new(
        "geoportail",
        "Géoportail",
        TileMatrixSet::new(NUMBER_OF_LEVELS, TILE_SIZE),
    )
    .add_layer(wmts_layer(
        api_key,
        "Carte",
        "GEOGRAPHICALGRIDSYSTEMS.MAPS.SCAN-EXPRESS.STANDARD",
        ImageFormat::Jpeg,
        "normal",
    ))
    .add_layer(wmts_layer(
        api_key,
        "Carte topographique",
        "GEOGRAPHICALGRIDSYSTEMS.MAPS",
        ImageFormat::Jpeg,
        "normal",
    ))
    .add_layer(wmts_layer(
        api_key,
        "Vue aérienne",
        "ORTHOIMAGERY.ORTHOPHOTOS",
        ImageFormat::Jpeg,
        "normal",
    ))
    .add_layer(wmts_layer(
        api_key,
        "Routes",
        "TRANSPORTNETWORKS.ROADS",
        ImageFormat::Png,
        "normal",
    ))
    .add_layer(wmts_layer(
        api_key,
        "Parcelles cadastrales",
        "CADASTRALPARCELS.PARCELS",
        ImageFormat::Png,
        "bdparcellaire",
    ))
}
