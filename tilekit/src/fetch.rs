//! Asynchronous tile downloads.
//!
//! [`TileFetcher`] resolves a [`TileSpec`] against the provider registry,
//! then hands the HTTP transfer to a background runtime. Callers get a
//! [`TileReply`] immediately and observe it through [`crate::ReplyState`].

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::USER_AGENT;

use crate::error::Error;
use crate::io::{HttpOptions, Runtime};
use crate::providers::{ImageFormat, ProviderRegistry, TileSpec};
use crate::reply::{self, Reply};

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Communication(error.to_string())
    }
}

/// Raw bytes of a downloaded tile, together with the image format the
/// layer advertises. Decoding is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePayload {
    pub bytes: Bytes,
    pub format: ImageFormat,
}

pub type TileReply = Reply<TilePayload>;

/// Downloads tiles for the providers known to a [`ProviderRegistry`].
///
/// The fetcher owns a background tokio runtime, so it can be driven from
/// synchronous code. All transfers share one HTTP client and its
/// connection pool.
pub struct TileFetcher {
    registry: Arc<ProviderRegistry>,
    client: reqwest::Client,
    user_agent: Option<crate::io::HeaderValue>,
    runtime: Runtime,
}

impl TileFetcher {
    pub fn new(registry: Arc<ProviderRegistry>, options: HttpOptions) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::Communication(error.to_string()))?;

        Ok(Self {
            registry,
            client,
            user_agent: options.user_agent,
            runtime: Runtime::new()?,
        })
    }

    /// Start downloading a tile. Never blocks.
    ///
    /// Resolution failures (unknown provider or layer, zoom level outside
    /// the provider's tile matrix set) are reported synchronously; the
    /// transfer itself runs in the background and settles the returned
    /// reply.
    pub fn fetch(&self, tile_spec: &TileSpec) -> Result<TileReply, Error> {
        let (url, format) = self.registry.tile_url(tile_spec)?;
        let (reply, writer, abort_rx) = reply::pending();

        let client = self.client.clone();
        let user_agent = self.user_agent.clone();
        self.runtime.spawn(reply::drive(writer, abort_rx, async move {
            download(client, user_agent, url, format).await
        }));

        Ok(reply)
    }
}

async fn download(
    client: reqwest::Client,
    user_agent: Option<crate::io::HeaderValue>,
    url: String,
    format: ImageFormat,
) -> Result<TilePayload, Error> {
    log::debug!("Downloading '{url}'.");

    let mut request = client.get(&url);
    if let Some(user_agent) = user_agent {
        request = request.header(USER_AGENT, user_agent);
    }

    let response = request.send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    Ok(TilePayload { bytes, format })
}
