//! Error types used by the crate.

use thiserror::Error;

/// Things that can go wrong when translating addresses or talking to a
/// tile service.
///
/// Construction-time validation failures are returned right away. Network
/// failures are never returned from `fetch`-like calls; they surface
/// through the terminal [`crate::ReplyState::Error`] state instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// Longitude or latitude outside the WGS84 domain.
    #[error("invalid coordinate")]
    InvalidCoordinate,

    /// Zoom level outside the tile matrix set.
    #[error("invalid zoom level {level}, this matrix set has {levels} levels")]
    InvalidLevel {
        /// The offending level.
        level: u8,
        /// Number of levels in the matrix set.
        levels: u8,
    },

    /// No provider registered under this name.
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    /// The provider has no layer with this map id.
    #[error("provider '{provider}' has no layer with map id {map_id}")]
    UnknownLayer {
        /// Provider which was asked.
        provider: String,
        /// The missing map id.
        map_id: u32,
    },

    /// Transport failure, with the transport's own diagnostic text.
    #[error("communication error: {0}")]
    Communication(String),

    /// Unsupported or failed coordinate transform.
    #[error("projection error")]
    Projection,
}
