//! Batched elevation lookups.
//!
//! [`ElevationService`] queries a REST endpoint for the elevation of a set
//! of coordinates in one request. The response is parsed leniently: a
//! malformed document yields an empty result, not an error, because a
//! partially available service is still a working map.

use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::error::Error;
use crate::io::{HeaderValue, HttpOptions, Runtime};
use crate::position::{ElevationWgs84, Wgs84};
use crate::reply::{self, Reply, ReplyState};

pub type ElevationReply = Reply<Vec<ElevationWgs84>>;

/// Client of an elevation REST service.
///
/// The wire format is the one used by IGN's alti service: a GET request
/// with `lon` and `lat` query parameters holding `|`-separated decimal
/// degrees, answered with a JSON document of the shape
/// `{"elevations": [{"lon": .., "lat": .., "z": .., "acc": ..}]}`.
pub struct ElevationService {
    endpoint: String,
    client: reqwest::Client,
    user_agent: Option<HeaderValue>,
    runtime: Runtime,
}

impl ElevationService {
    pub fn new(endpoint: impl Into<String>, options: HttpOptions) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| Error::Communication(error.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            user_agent: options.user_agent,
            runtime: Runtime::new()?,
        })
    }

    /// Service of the French Institut national de l'information
    /// géographique et forestière.
    pub fn ign(api_key: &str, options: HttpOptions) -> Result<Self, Error> {
        Self::new(
            format!("https://wxs.ign.fr/{api_key}/alti/rest/elevation.json"),
            options,
        )
    }

    /// Start an elevation query for the given coordinates. Never blocks.
    ///
    /// An empty batch settles as `Finished` with an empty result without
    /// touching the network.
    pub fn request(&self, coordinates: &[Wgs84]) -> ElevationReply {
        let (reply, writer, abort_rx) = reply::pending();

        if coordinates.is_empty() {
            writer.transition(ReplyState::Finished(Vec::new()));
            return reply;
        }

        let url = self.request_url(coordinates);
        let client = self.client.clone();
        let user_agent = self.user_agent.clone();
        self.runtime.spawn(reply::drive(writer, abort_rx, async move {
            query(client, user_agent, url).await
        }));

        reply
    }

    fn request_url(&self, coordinates: &[Wgs84]) -> String {
        let longitudes: Vec<String> = coordinates
            .iter()
            .map(|coordinate| coordinate.longitude().to_string())
            .collect();
        let latitudes: Vec<String> = coordinates
            .iter()
            .map(|coordinate| coordinate.latitude().to_string())
            .collect();

        format!(
            "{}?lon={}&lat={}",
            self.endpoint,
            longitudes.join("|"),
            latitudes.join("|")
        )
    }
}

async fn query(
    client: reqwest::Client,
    user_agent: Option<HeaderValue>,
    url: String,
) -> Result<Vec<ElevationWgs84>, Error> {
    log::debug!("Querying '{url}'.");

    let mut request = client.get(&url);
    if let Some(user_agent) = user_agent {
        request = request.header(USER_AGENT, user_agent);
    }

    let response = request.send().await?.error_for_status()?;
    let payload = response.bytes().await?;
    Ok(parse_elevations(&payload))
}

#[derive(Debug, Deserialize)]
struct ElevationDocument {
    #[serde(default)]
    elevations: Vec<ElevationRecord>,
}

#[derive(Debug, Deserialize)]
struct ElevationRecord {
    lon: f64,
    lat: f64,
    z: f64,
    #[serde(default)]
    #[allow(dead_code)]
    acc: f64,
}

/// Lenient parse: anything that is not a well-formed elevation document
/// yields an empty batch.
fn parse_elevations(payload: &[u8]) -> Vec<ElevationWgs84> {
    let document: ElevationDocument = match serde_json::from_slice(payload) {
        Ok(document) => document,
        Err(error) => {
            log::warn!("Malformed elevation response: {error}.");
            return Vec::new();
        }
    };

    document
        .elevations
        .into_iter()
        .map(|record| {
            let coordinate =
                Wgs84::new(record.lon, record.lat).unwrap_or_else(|_| Wgs84::invalid());
            ElevationWgs84::from_coordinate(coordinate, record.z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::ReplyState;

    const RESPONSE: &str = concat!(
        r#"{"elevations": ["#,
        r#"{"lon": 2.478917, "lat": 48.805639, "z": 92.04, "acc": 2.5},"#,
        r#"{"lon": 2.4828, "lat": 48.80298, "z": 88.23, "acc": 2.5}"#,
        r#"]}"#
    );

    #[test]
    fn parses_a_well_formed_document() {
        let elevations = parse_elevations(RESPONSE.as_bytes());

        assert_eq!(elevations.len(), 2);
        assert_eq!(elevations[0].longitude(), 2.478917);
        assert_eq!(elevations[0].latitude(), 48.805639);
        assert_eq!(elevations[0].elevation(), 92.04);
        assert_eq!(elevations[1].elevation(), 88.23);
    }

    #[test]
    fn malformed_documents_yield_an_empty_batch() {
        assert!(parse_elevations(b"not json at all").is_empty());
        assert!(parse_elevations(b"{}").is_empty());
        assert!(parse_elevations(br#"{"elevations": "oops"}"#).is_empty());
        assert!(parse_elevations(br#"{"something": "else"}"#).is_empty());
    }

    #[test]
    fn missing_accuracy_is_tolerated() {
        let elevations =
            parse_elevations(br#"{"elevations": [{"lon": 1.0, "lat": 2.0, "z": 3.0}]}"#);

        assert_eq!(elevations.len(), 1);
        assert_eq!(elevations[0].elevation(), 3.0);
    }

    #[tokio::test]
    async fn queries_all_coordinates_in_one_request() {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = hypermock::Server::bind().await;
        let mut anticipated = server.anticipate("/elevation.json").await;

        let service = ElevationService::new(
            format!("http://localhost:{}/elevation.json", server.port()),
            HttpOptions::default(),
        )
        .unwrap();

        let batch = [
            Wgs84::new(2.478917, 48.805639).unwrap(),
            Wgs84::new(2.4828, 48.80298).unwrap(),
        ];
        let mut reply = service.request(&batch);

        let head = anticipated.expect().await;
        assert_eq!(
            head.uri.query(),
            Some("lon=2.478917|2.4828&lat=48.805639|48.80298")
        );
        anticipated.respond(RESPONSE.as_bytes()).await;

        match reply.wait_terminal().await {
            ReplyState::Finished(elevations) => {
                assert_eq!(elevations.len(), 2);
                assert_eq!(elevations[0].elevation(), 92.04);
            }
            state => panic!("unexpected terminal state {state:?}"),
        }
    }

    #[tokio::test]
    async fn http_failure_settles_as_error() {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = hypermock::Server::bind().await;
        let anticipated = server.anticipate("/elevation.json").await;

        let service = ElevationService::new(
            format!("http://localhost:{}/elevation.json", server.port()),
            HttpOptions::default(),
        )
        .unwrap();
        let mut reply = service.request(&[Wgs84::new(0., 0.).unwrap()]);

        anticipated
            .respond_with_status(hypermock::hyper::StatusCode::SERVICE_UNAVAILABLE)
            .await;

        assert!(matches!(
            reply.wait_terminal().await,
            ReplyState::Error(Error::Communication(_))
        ));
    }

    #[tokio::test]
    async fn an_empty_batch_settles_without_a_request() {
        let service =
            ElevationService::new("http://localhost:1/unused", HttpOptions::default()).unwrap();

        let mut reply = service.request(&[]);
        assert_eq!(reply.wait_terminal().await, ReplyState::Finished(Vec::new()));
    }

    #[tokio::test]
    async fn aborted_query_stays_aborted() {
        let _ = env_logger::builder().is_test(true).try_init();
        let server = hypermock::Server::bind().await;
        let mut anticipated = server.anticipate("/elevation.json").await;

        let service = ElevationService::new(
            format!("http://localhost:{}/elevation.json", server.port()),
            HttpOptions::default(),
        )
        .unwrap();
        let mut reply = service.request(&[Wgs84::new(0., 0.).unwrap()]);

        anticipated.expect().await;
        reply.abort();
        anticipated.respond(RESPONSE.as_bytes()).await;

        assert_eq!(reply.wait_terminal().await, ReplyState::Aborted);
    }
}
