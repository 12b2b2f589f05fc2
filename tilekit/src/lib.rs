#![doc = include_str!("../README.md")]

mod angle;
mod elevation;
mod error;
mod fetch;
mod geodesy;
mod io;
mod mercator;
mod position;
pub mod providers;
mod reply;
mod tile_matrix;

pub use angle::{to_decimal, to_sexagesimal, SexagesimalAngle};
pub use elevation::{ElevationReply, ElevationService};
pub use error::Error;
pub use fetch::{TileFetcher, TilePayload, TileReply};
pub use geodesy::{
    bearing, destination, distance, EQUATORIAL_DIAMETER, EQUATORIAL_PERIMETER, EQUATORIAL_RADIUS,
    HALF_EQUATORIAL_PERIMETER,
};
pub use io::{HeaderValue, HttpOptions};
pub use mercator::{NormalizedWebMercator, PseudoWebMercator, WebMercator};
pub use position::{lat_lon, lon_lat, ElevationWgs84, Wgs84};
pub use reply::{Reply, ReplyState};
pub use tile_matrix::{total_tiles, TileId, TileMatrixSet, MAX_LEVELS};
