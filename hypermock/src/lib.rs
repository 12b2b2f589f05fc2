//! Minimal HTTP mock server for exercising network clients in tests.
//!
//! Every request must be anticipated before it arrives. The test decides
//! when (and whether) to respond, which makes it possible to test things
//! like cancellation while a request is still in flight.

use std::{
    collections::HashMap,
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::{Arc, Mutex},
};

use http_body_util::Full;
use hyper::{body::Bytes, server::conn::http1, service::Service, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

pub use hyper;

type RequestHead = hyper::http::request::Parts;

#[derive(Default)]
struct State {
    /// Paths registered via [`Server::anticipate`], not yet requested.
    anticipations: HashMap<String, Pending>,

    /// Requests which came without a prior anticipation. Failing the test
    /// in [`Server::drop`] is more useful than failing inside the service,
    /// where the panic would be swallowed by the connection task.
    unexpected: Vec<String>,
}

struct Pending {
    head_tx: tokio::sync::oneshot::Sender<RequestHead>,
    response_rx: tokio::sync::oneshot::Receiver<(StatusCode, Bytes)>,
}

/// HTTP server bound to a random local port.
pub struct Server {
    port: u16,
    state: Arc<Mutex<State>>,
}

impl Server {
    /// Create a new [`Server`] and bind it to a random port.
    ///
    /// # Panics
    ///
    /// Panics when no local port can be bound. It is meant to be used in
    /// tests, where this is the desired behavior.
    #[allow(clippy::unwrap_used)]
    pub async fn bind() -> Server {
        let state = Arc::new(Mutex::new(State::default()));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let state_clone = state.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                let io = TokioIo::new(stream);

                let service = MockService {
                    state: state_clone.clone(),
                };
                tokio::task::spawn(async move {
                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        log::debug!("Connection ended: {e}.");
                    }
                });
            }
        });

        Server { port, state }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Anticipate a single request for the given path.
    #[allow(clippy::unwrap_used)]
    pub async fn anticipate(&self, path: impl Into<String>) -> Anticipation {
        let path = path.into();
        log::info!("Anticipating '{path}'.");
        let (head_tx, head_rx) = tokio::sync::oneshot::channel();
        let (response_tx, response_rx) = tokio::sync::oneshot::channel();
        self.state.lock().unwrap().anticipations.insert(
            path,
            Pending {
                head_tx,
                response_rx,
            },
        );
        Anticipation {
            head_rx: Some(head_rx),
            response_tx: Some(response_tx),
        }
    }
}

impl Drop for Server {
    #[allow(clippy::unwrap_used)]
    fn drop(&mut self) {
        let unexpected = &self.state.lock().unwrap().unexpected;
        if !unexpected.is_empty() {
            panic!("unexpected requests: {unexpected:?}");
        }
    }
}

/// Single anticipated request. The server keeps the connection open until
/// one of the `respond` functions is called, or this struct is dropped.
pub struct Anticipation {
    head_rx: Option<tokio::sync::oneshot::Receiver<RequestHead>>,
    response_tx: Option<tokio::sync::oneshot::Sender<(StatusCode, Bytes)>>,
}

impl Anticipation {
    /// Wait for the request to arrive and return its head (method, URI,
    /// headers). The response is not sent yet.
    ///
    /// # Panics
    ///
    /// Panics when called twice, or when the server goes down first.
    #[allow(clippy::unwrap_used)]
    pub async fn expect(&mut self) -> RequestHead {
        self.head_rx
            .take()
            .expect("this request was already expected")
            .await
            .unwrap()
    }

    /// Respond with 200 and the given payload.
    pub async fn respond(self, payload: impl Into<Bytes>) {
        self.respond_with(StatusCode::OK, payload.into());
    }

    /// Respond with the given status and an empty body.
    pub async fn respond_with_status(self, status: StatusCode) {
        self.respond_with(status, Bytes::new());
    }

    #[allow(clippy::unwrap_used)]
    fn respond_with(mut self, status: StatusCode, payload: Bytes) {
        log::info!("Responding with {status}.");
        // The client might have hung up already, e.g. when the test
        // aborted the request on purpose.
        if self.response_tx.take().unwrap().send((status, payload)).is_err() {
            log::debug!("Nobody is waiting for this response.");
        }
    }
}

struct MockService {
    state: Arc<Mutex<State>>,
}

impl Service<Request<hyper::body::Incoming>> for MockService {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    #[allow(clippy::unwrap_used)]
    fn call(&self, request: Request<hyper::body::Incoming>) -> Self::Future {
        log::info!("Incoming request '{}'.", request.uri());
        let state = self.state.clone();
        Box::pin(async move {
            let pending = state
                .lock()
                .unwrap()
                .anticipations
                .remove(request.uri().path());

            if let Some(pending) = pending {
                let (head, _body) = request.into_parts();
                // The test might not care about the head at all.
                let _ = pending.head_tx.send(head);

                match pending.response_rx.await {
                    Ok((status, payload)) => Ok(Response::builder()
                        .status(status)
                        .body(Full::new(payload))
                        .unwrap()),
                    Err(_) => {
                        // Anticipation dropped without responding; hang up.
                        log::debug!("Anticipation dropped, closing connection.");
                        Ok(Response::builder()
                            .status(StatusCode::INTERNAL_SERVER_ERROR)
                            .body(Full::new(Bytes::new()))
                            .unwrap())
                    }
                }
            } else {
                log::warn!("Unexpected '{}'.", request.uri());
                state
                    .lock()
                    .unwrap()
                    .unexpected
                    .push(request.uri().to_string());
                Ok(Response::builder()
                    .status(StatusCode::IM_A_TEAPOT)
                    .body(Full::new(Bytes::from_static(b"unexpected")))
                    .unwrap())
            }
        })
    }
}
