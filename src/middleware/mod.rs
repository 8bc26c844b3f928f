//! Middleware layer.
//!
//! A [`Middleware`] is a value that turns one handler into another: it
//! receives the next handler in the chain and returns a new handler that
//! runs its own logic before, after, or instead of the inner call.
//! [`chain`] folds an ordered list of middleware around a base handler and
//! returns a plain handler, so a fully-layered route registers on the
//! [`Router`](crate::Router) exactly like a bare one.
//!
//! The first middleware in the list becomes the outermost wrapper:
//! `chain(base, vec![a, b])` runs `a`'s pre-logic, then `b`'s, then `base`,
//! then unwinds through `b` and finally `a`.
//!
//! ```rust,no_run
//! use weft::{middleware, Method, Request, Response, Router};
//!
//! async fn hello(_req: Request) -> Response {
//!     Response::text("hello")
//! }
//!
//! let app = Router::new().on(
//!     "/hello",
//!     middleware::chain(
//!         hello,
//!         vec![middleware::logging(), middleware::require_method(Method::GET)],
//!     ),
//! );
//! ```
//!
//! [`logged`] is the low-ceremony alternative: it wraps a single handler
//! directly, without going through the chain, and only announces the
//! request path. Use it where a full chain would be noise.

use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use tracing::{debug, info, warn};

use crate::handler::{BoxedHandler, ErasedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// A handler-to-handler transformation.
///
/// Middleware runs once per registration to build the wrapped handler; the
/// closures it captures run on every request and must therefore be safe to
/// invoke concurrently.
pub type Middleware = Box<dyn Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static>;

/// Folds `middlewares` around `base` and returns the composed handler.
///
/// `chain(base, vec![m1, m2, …, mn])` is equivalent to
/// `m1(m2(…mn(base)…))`: the first middleware in the list is the outermost
/// layer, executed first on the way in and last on the way out. List order
/// is the only thing that determines nesting — keep short-circuiting
/// middleware innermost if wrappers like [`logging`] should still observe
/// rejected requests.
pub fn chain(base: impl Handler, middlewares: Vec<Middleware>) -> impl Handler {
    let composed = middlewares
        .into_iter()
        .rev()
        .fold(base.into_boxed_handler(), |handler, middleware| middleware(handler));

    move |req: Request| {
        let composed = Arc::clone(&composed);
        async move { composed.call(req).await }
    }
}

/// Timing middleware: logs the request path and elapsed duration once the
/// inner handler is done.
///
/// The completion log is emitted from a guard's `Drop`, so it fires on every
/// exit path out of the inner call — normal return, panic, or a future
/// dropped mid-flight when the client goes away.
pub fn logging() -> Middleware {
    Box::new(|next: BoxedHandler| {
        (move |req: Request| {
            let next = Arc::clone(&next);
            async move {
                let _timer = RequestTimer::start(req.path());
                next.call(req).await
            }
        })
        .into_boxed_handler()
    })
}

/// Method-filter middleware: rejects any request whose method is not
/// `expected` with `400 Bad Request` before the inner handler runs.
///
/// The rejection body is the status code's canonical reason phrase.
pub fn require_method(expected: Method) -> Middleware {
    Box::new(move |next: BoxedHandler| {
        let expected = expected.clone();
        (move |req: Request| {
            let next = Arc::clone(&next);
            let expected = expected.clone();
            async move {
                if req.method() != &expected {
                    warn!(
                        method = %req.method(),
                        expected = %expected,
                        path = %req.path(),
                        "method rejected"
                    );
                    let status = StatusCode::BAD_REQUEST;
                    return Response::builder()
                        .status(status)
                        .text(status.canonical_reason().unwrap_or_default());
                }
                debug!(method = %expected, path = %req.path(), "method accepted");
                next.call(req).await
            }
        })
        .into_boxed_handler()
    })
}

/// Wraps a single handler with a path log line — no timing, no
/// short-circuiting, no chain.
pub fn logged(handler: impl Handler) -> impl Handler {
    let inner = handler.into_boxed_handler();
    move |req: Request| {
        let inner = Arc::clone(&inner);
        async move {
            info!(path = %req.path(), "request");
            inner.call(req).await
        }
    }
}

// ── Timing guard ──────────────────────────────────────────────────────────────

/// Logs elapsed time when dropped, whatever path execution took to get there.
struct RequestTimer {
    path: String,
    start: Instant,
}

impl RequestTimer {
    fn start(path: &str) -> Self {
        debug!(path = %path, "timing request");
        Self { path: path.to_owned(), start: Instant::now() }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        info!(path = %self.path, elapsed = ?self.start.elapsed(), "request served");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use bytes::Bytes;
    use http::HeaderMap;

    use super::*;

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path.to_owned(), HeaderMap::new(), Bytes::new(), HashMap::new())
    }

    /// Middleware that appends `{name}-pre` / `{name}-post` around the inner
    /// call, for asserting nesting order.
    fn recording(name: &'static str, calls: Arc<Mutex<Vec<String>>>) -> Middleware {
        Box::new(move |next: BoxedHandler| {
            let calls = Arc::clone(&calls);
            (move |req: Request| {
                let next = Arc::clone(&next);
                let calls = Arc::clone(&calls);
                async move {
                    calls.lock().unwrap().push(format!("{name}-pre"));
                    let res = next.call(req).await;
                    calls.lock().unwrap().push(format!("{name}-post"));
                    res
                }
            })
            .into_boxed_handler()
        })
    }

    #[tokio::test]
    async fn chain_nests_first_middleware_outermost() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let base_calls = Arc::clone(&calls);
        let base = move |_req: Request| {
            let calls = Arc::clone(&base_calls);
            async move {
                calls.lock().unwrap().push("base".to_owned());
                Response::text("done")
            }
        };

        let handler = chain(
            base,
            vec![
                recording("a", Arc::clone(&calls)),
                recording("b", Arc::clone(&calls)),
            ],
        )
        .into_boxed_handler();

        handler.call(request(Method::GET, "/")).await;

        assert_eq!(
            *calls.lock().unwrap(),
            ["a-pre", "b-pre", "base", "b-post", "a-post"]
        );
    }

    #[tokio::test]
    async fn empty_chain_is_just_the_base_handler() {
        let handler =
            chain(|_req: Request| async { Response::text("bare") }, Vec::new())
                .into_boxed_handler();

        let res = handler.call(request(Method::GET, "/")).await;
        assert_eq!(&res.body[..], b"bare");
    }

    #[tokio::test]
    async fn method_filter_short_circuits_on_mismatch() {
        let invoked = Arc::new(AtomicBool::new(false));

        let invoked_by_base = Arc::clone(&invoked);
        let base = move |_req: Request| {
            let invoked = Arc::clone(&invoked_by_base);
            async move {
                invoked.store(true, Ordering::SeqCst);
                Response::text("inner")
            }
        };

        let handler =
            chain(base, vec![require_method(Method::GET)]).into_boxed_handler();

        let denied = handler.call(request(Method::POST, "/hello")).await;
        assert_eq!(denied.status, StatusCode::BAD_REQUEST);
        assert_eq!(&denied.body[..], b"Bad Request");
        assert!(!invoked.load(Ordering::SeqCst), "inner handler ran on a rejected method");

        let allowed = handler.call(request(Method::GET, "/hello")).await;
        assert_eq!(allowed.status, StatusCode::OK);
        assert_eq!(&allowed.body[..], b"inner");
        assert!(invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn logging_passes_the_response_through() {
        let handler = chain(
            |_req: Request| async { Response::text("ok") },
            vec![logging()],
        )
        .into_boxed_handler();

        let res = handler.call(request(Method::GET, "/timed")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(&res.body[..], b"ok");
    }

    #[tokio::test]
    async fn logged_wraps_without_a_chain() {
        let handler = logged(|_req: Request| async { Response::text("plain") })
            .into_boxed_handler();

        let res = handler.call(request(Method::POST, "/anything")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(&res.body[..], b"plain");
    }
}
