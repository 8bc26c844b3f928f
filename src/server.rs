//! HTTP server.
//!
//! One tokio task per inbound connection; hyper's auto connection builder
//! drives HTTP/1.1 or HTTP/2, whatever the client speaks. The server runs
//! until the process is killed — failures split two ways:
//!
//! - **Fatal**: binding the listening socket. Returned as an [`Error`] for
//!   `main` to report and exit on.
//! - **Survivable**: anything on an individual connection, including a
//!   response write to a client that already hung up. Logged, connection
//!   dropped, accept loop keeps going.

use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Error;
use crate::handler::ErasedHandler as _;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Configures the server from loaded startup configuration: all
    /// interfaces, on the configured port.
    ///
    /// ```rust,no_run
    /// use weft::{Config, Router, Server};
    ///
    /// # async fn run() -> Result<(), weft::Error> {
    /// let config = Config::from_file(".env")?;
    /// Server::from_config(&config).serve(Router::new()).await
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Self {
        Self { addr: SocketAddr::from(([0, 0, 0, 0], config.port())) }
    }

    /// Binds the listening socket and serves `router` until the process
    /// dies. Only a bind failure returns; everything after that point is
    /// handled per-connection.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // Shared across connection tasks without copying the route table.
        let router = Arc::new(router);

        info!(addr = %self.addr, "listening");

        loop {
            let (stream, remote_addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("accept error: {e}");
                    continue;
                }
            };

            let router = Arc::clone(&router);
            // TokioIo adapts tokio's AsyncRead/AsyncWrite to hyper's IO traits.
            let io = TokioIo::new(stream);

            tokio::spawn(async move {
                // `service_fn` is invoked once per request on the
                // connection, not once per connection.
                let svc = service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move { dispatch(router, req).await }
                });

                if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                    .serve_connection(io, svc)
                    .await
                {
                    error!(peer = %remote_addr, "connection error: {e}");
                }
            });
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: routes one request and produces one response.
///
/// The error type is [`Infallible`](std::convert::Infallible) — every
/// failure becomes an HTTP status (404, 400, …) so hyper never sees an
/// error from the service.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_owned();

    let response = match router.lookup(&path) {
        Some((handler, params)) => match body.collect().await {
            Ok(collected) => {
                let request =
                    Request::new(parts.method, path, parts.headers, collected.to_bytes(), params);
                handler.call(request).await
            }
            Err(e) => {
                error!(path = %path, "request body error: {e}");
                Response::status(http::StatusCode::BAD_REQUEST)
            }
        },
        None => Response::status(http::StatusCode::NOT_FOUND),
    };

    Ok(response.into_inner())
}
