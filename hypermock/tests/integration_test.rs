use std::time::Duration;

use hypermock::{hyper::StatusCode, Server};

#[tokio::test]
async fn anticipation_then_request() {
    let _ = env_logger::try_init();

    let server = Server::bind().await;
    let url = format!("http://localhost:{}/foo", server.port());
    let mut anticipated = server.anticipate("/foo").await;

    // Make sure that the server's internals kick in.
    tokio::time::sleep(Duration::from_millis(100)).await;

    futures::future::join(
        async {
            let response = reqwest::get(url).await.unwrap();
            let bytes = response.bytes().await.unwrap();
            assert_eq!(&bytes[..], b"hello");
        },
        async {
            let head = anticipated.expect().await;
            assert_eq!(head.uri.path(), "/foo");
            anticipated.respond(b"hello".as_slice()).await;
        },
    )
    .await;
}

#[tokio::test]
async fn responding_with_a_status() {
    let _ = env_logger::try_init();

    let server = Server::bind().await;
    let url = format!("http://localhost:{}/foo", server.port());
    let anticipated = server.anticipate("/foo").await;

    futures::future::join(
        async {
            let response = reqwest::get(url).await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        },
        async {
            anticipated.respond_with_status(StatusCode::NOT_FOUND).await;
        },
    )
    .await;
}

#[tokio::test]
#[should_panic(expected = "unexpected requests")]
async fn unexpected_request_fails_the_test() {
    let _ = env_logger::try_init();

    let server = Server::bind().await;
    let url = format!("http://localhost:{}/foo", server.port());

    let response = reqwest::get(url).await.unwrap();
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..], b"unexpected");
}
