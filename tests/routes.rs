//! End-to-end route tests: real sockets, raw HTTP/1.1 exchanges.
//!
//! Each test spawns the demo route table on its own fixed localhost port and
//! talks to it with a plain `TcpStream`, so the assertions cover the whole
//! stack — accept loop, dispatch, middleware, response encoding.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use weft::{Method, Request, Response, Router, Server, middleware};

async fn foo(_req: Request) -> Response {
    Response::text("foo\n")
}

async fn bar(_req: Request) -> Response {
    Response::text("bar\n")
}

async fn hello(_req: Request) -> Response {
    Response::text("Hello World with Middleware!")
}

fn demo_router() -> Router {
    Router::new()
        .on("/foo", middleware::logged(foo))
        .on("/bar", middleware::logged(bar))
        .on(
            "/hello",
            middleware::chain(
                hello,
                vec![middleware::logging(), middleware::require_method(Method::GET)],
            ),
        )
}

/// Spawns the demo app on `port` and waits until it accepts connections.
async fn spawn_app(port: u16) {
    tokio::spawn(async move {
        Server::bind(&format!("127.0.0.1:{port}"))
            .serve(demo_router())
            .await
            .unwrap();
    });

    for _ in 0..50 {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on port {port} never came up");
}

/// One raw HTTP/1.1 request over a fresh connection. Returns (status, body).
async fn send(port: u16, method: &str, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request =
        format!("{method} {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8(raw).unwrap();

    let status = text
        .split_whitespace()
        .nth(1)
        .expect("malformed status line")
        .parse()
        .expect("non-numeric status");
    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_owned())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn foo_and_bar_answer_any_method() {
    spawn_app(48311).await;

    assert_eq!(send(48311, "GET", "/foo").await, (200, "foo\n".to_owned()));
    assert_eq!(send(48311, "POST", "/foo").await, (200, "foo\n".to_owned()));
    assert_eq!(send(48311, "GET", "/bar").await, (200, "bar\n".to_owned()));
    assert_eq!(send(48311, "PUT", "/bar").await, (200, "bar\n".to_owned()));
}

#[tokio::test]
async fn hello_is_get_only() {
    spawn_app(48312).await;

    let (status, body) = send(48312, "GET", "/hello").await;
    assert_eq!(status, 200);
    assert_eq!(body, "Hello World with Middleware!");

    let (status, body) = send(48312, "POST", "/hello").await;
    assert_eq!(status, 400);
    assert_eq!(body, "Bad Request");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    spawn_app(48313).await;

    let (status, _body) = send(48313, "GET", "/nope").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn concurrent_requests_get_independent_responses() {
    spawn_app(48314).await;

    let mut clients = Vec::new();
    for i in 0..32 {
        clients.push(tokio::spawn(async move {
            if i % 2 == 0 {
                (send(48314, "GET", "/foo").await, "foo\n")
            } else {
                (send(48314, "GET", "/bar").await, "bar\n")
            }
        }));
    }

    for client in clients {
        let ((status, body), expected) = client.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body, expected);
    }
}
