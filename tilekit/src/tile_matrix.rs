//! Tile pyramid addressing.
//!
//! A tile matrix set is the standard quad-tree pyramid: level `L` covers
//! the world with `2^L x 2^L` tiles. Addressing happens in the
//! [`NormalizedWebMercator`] space, so it is independent of the provider's
//! projection details.
//! <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>

use crate::error::Error;
use crate::geodesy::EQUATORIAL_PERIMETER;
use crate::mercator::NormalizedWebMercator;

/// Number of tiles per axis at the given zoom level.
pub fn total_tiles(zoom: u8) -> u32 {
    2u32.pow(u32::from(zoom))
}

/// Coordinates of an OSM-like tile.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TileId {
    /// X number of the tile, growing eastward.
    pub x: u32,

    /// Y number of the tile, growing southward.
    pub y: u32,

    /// Zoom level, where 0 means no zoom.
    /// See: <https://wiki.openstreetmap.org/wiki/Zoom_levels>
    pub zoom: u8,
}

impl TileId {
    pub fn east(&self) -> Option<TileId> {
        (self.x < total_tiles(self.zoom) - 1).then_some(TileId {
            x: self.x + 1,
            y: self.y,
            zoom: self.zoom,
        })
    }

    pub fn west(&self) -> Option<TileId> {
        Some(TileId {
            x: self.x.checked_sub(1)?,
            y: self.y,
            zoom: self.zoom,
        })
    }

    pub fn north(&self) -> Option<TileId> {
        Some(TileId {
            x: self.x,
            y: self.y.checked_sub(1)?,
            zoom: self.zoom,
        })
    }

    pub fn south(&self) -> Option<TileId> {
        (self.y < total_tiles(self.zoom) - 1).then_some(TileId {
            x: self.x,
            y: self.y + 1,
            zoom: self.zoom,
        })
    }

    pub fn valid(&self) -> bool {
        self.x < total_tiles(self.zoom) && self.y < total_tiles(self.zoom)
    }
}

/// Per-provider description of the tile pyramid: how many zoom levels it
/// serves and how big its tiles are. Built once at provider registration,
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMatrixSet {
    levels: u8,
    tile_size: u32,
}

/// Deepest representable pyramid; grid sizes are stored in `u32`.
pub const MAX_LEVELS: u8 = 31;

impl TileMatrixSet {
    /// `levels` is capped at [`MAX_LEVELS`].
    pub fn new(levels: u8, tile_size: u32) -> Self {
        Self {
            levels: levels.min(MAX_LEVELS),
            tile_size,
        }
    }

    /// Number of zoom levels; valid levels are `0..levels`.
    pub fn levels(&self) -> u8 {
        self.levels
    }

    /// Size of a single square tile, in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn check_level(&self, level: u8) -> Result<(), Error> {
        if level < self.levels {
            Ok(())
        } else {
            Err(Error::InvalidLevel {
                level,
                levels: self.levels,
            })
        }
    }

    /// Number of tiles per axis at `level`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLevel`] when `level` is outside the set.
    pub fn grid_size(&self, level: u8) -> Result<u32, Error> {
        self.check_level(level)?;
        Ok(total_tiles(level))
    }

    /// The tile containing the given normalized coordinate at `level`.
    /// Coordinates on the far edge of the map are clamped into the last
    /// tile.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLevel`] when `level` is outside the set.
    pub fn tile_id(&self, coordinate: NormalizedWebMercator, level: u8) -> Result<TileId, Error> {
        let grid_size = f64::from(self.grid_size(level)?);
        let last = self.grid_size(level)? - 1;

        let x = ((coordinate.x() * grid_size).floor() as u32).min(last);
        let y = ((coordinate.y() * grid_size).floor() as u32).min(last);

        Ok(TileId { x, y, zoom: level })
    }

    /// Normalized (top-left, bottom-right) corners of a tile, the inverse
    /// of [`TileMatrixSet::tile_id`]. Used for coverage and viewport
    /// intersection tests.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLevel`] when the tile's zoom level is
    /// outside the set.
    pub fn tile_bounds(
        &self,
        tile_id: TileId,
    ) -> Result<(NormalizedWebMercator, NormalizedWebMercator), Error> {
        let grid_size = f64::from(self.grid_size(tile_id.zoom)?);

        let top_left =
            NormalizedWebMercator::new(f64::from(tile_id.x) / grid_size, f64::from(tile_id.y) / grid_size);
        let bottom_right = NormalizedWebMercator::new(
            f64::from(tile_id.x + 1) / grid_size,
            f64::from(tile_id.y + 1) / grid_size,
        );

        Ok((top_left, bottom_right))
    }

    /// Ground resolution at `level`, in meters per pixel at the equator.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLevel`] when `level` is outside the set.
    pub fn resolution(&self, level: u8) -> Result<f64, Error> {
        self.check_level(level)?;
        Ok(EQUATORIAL_PERIMETER / (f64::from(self.tile_size) * f64::from(total_tiles(level))))
    }

    /// Length of a tile edge at `level`, in meters at the equator.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLevel`] when `level` is outside the set.
    pub fn tile_length_m(&self, level: u8) -> Result<f64, Error> {
        Ok(self.resolution(level)? * f64::from(self.tile_size))
    }

    /// The level whose resolution is closest to the given one, clamped
    /// into the set.
    pub fn closest_level(&self, resolution: f64) -> u8 {
        let root_resolution = EQUATORIAL_PERIMETER / f64::from(self.tile_size);
        let level = (root_resolution / resolution).log2().round();
        level.clamp(0., f64::from(self.levels.saturating_sub(1))) as u8
    }
}
