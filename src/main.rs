//! Demo server: three routes behind the middleware layer.
//!
//! Reads `PORT` from a `.env` file in the working directory, then serves:
//!
//! - `/foo`, `/bar` — any method, wrapped with the plain path logger
//! - `/hello` — GET only, timed; other methods get `400 Bad Request`
//! - `/healthz`, `/readyz` — health probes
//!
//! Run with `RUST_LOG=debug cargo run`, then:
//!
//! ```text
//! curl http://localhost:8080/foo
//! curl http://localhost:8080/hello
//! curl -X POST http://localhost:8080/hello
//! ```

use tracing::{error, info};
use weft::{Config, Method, Request, Response, Router, Server, health, middleware};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_file(".env") {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load .env: {e}");
            std::process::exit(1);
        }
    };
    info!(port = config.port(), "configuration loaded");

    let app = Router::new()
        .on("/foo", middleware::logged(foo))
        .on("/bar", middleware::logged(bar))
        .on(
            "/hello",
            middleware::chain(
                hello,
                vec![middleware::logging(), middleware::require_method(Method::GET)],
            ),
        )
        .on("/healthz", health::liveness)
        .on("/readyz", health::readiness);

    if let Err(e) = Server::from_config(&config).serve(app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn foo(_req: Request) -> Response {
    info!("foo ok");
    Response::text("foo\n")
}

async fn bar(_req: Request) -> Response {
    info!("bar ok");
    Response::text("bar\n")
}

async fn hello(_req: Request) -> Response {
    Response::text("Hello World with Middleware!")
}
