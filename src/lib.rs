//! # weft
//!
//! A small HTTP framework whose one idea is the middleware layer.
//!
//! A handler is any `async fn(Request) -> impl IntoResponse`. A middleware is
//! a value that turns one handler into another. [`middleware::chain`] folds a
//! list of middleware around a base handler and hands back something you can
//! register on a [`Router`] like any other handler — the layering happens
//! once at registration time and costs one `Arc` clone plus one virtual call
//! per layer per request.
//!
//! Routing dispatches on the path alone. If a route should only answer one
//! HTTP method, say so with [`middleware::require_method`] — method policy is
//! a cross-cutting concern, so it lives in the middleware layer, not in the
//! route table.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use weft::{middleware, Config, Method, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     let config = Config::from_file(".env").expect("config");
//!
//!     let app = Router::new().on(
//!         "/hello",
//!         middleware::chain(
//!             hello,
//!             vec![middleware::logging(), middleware::require_method(Method::GET)],
//!         ),
//!     );
//!
//!     Server::from_config(&config).serve(app).await.expect("server error");
//! }
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//! ```

mod config;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use config::Config;
pub use error::Error;
pub use handler::{BoxedHandler, Handler};
pub use http::{Method, StatusCode};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
