//! Radix-tree request router.
//!
//! One tree, keyed by path alone. O(path-length) lookup via [`matchit`].
//! Dispatch does not look at the HTTP method — a registered handler sees
//! every method, and routes that care narrow themselves with
//! [`middleware::require_method`](crate::middleware::require_method).

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application route table.
///
/// Build it once at startup and hand it to
/// [`Server::serve`](crate::Server::serve). Each [`Router::on`] call returns
/// `self`, so registrations chain.
pub struct Router {
    routes: MatchitRouter<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: MatchitRouter::new() }
    }

    /// Registers `handler` for `path`. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read back with
    /// [`Request::param`](crate::Request::param):
    ///
    /// ```rust,no_run
    /// # use weft::{Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn list_users(_: Request) -> Response { Response::text("") }
    /// let app = Router::new()
    ///     .on("/users", list_users)
    ///     .on("/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with an
    /// existing registration. Routes are wired at startup; a bad route table
    /// is a programming error, not a runtime condition.
    pub fn on(mut self, path: &str, handler: impl Handler) -> Self {
        self.routes
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let matched = self.routes.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use http::{HeaderMap, Method};

    use crate::handler::ErasedHandler as _;
    use crate::{Request, Response};

    use super::*;

    fn request(method: Method, path: &str, params: HashMap<String, String>) -> Request {
        Request::new(method, path.to_owned(), HeaderMap::new(), Bytes::new(), params)
    }

    #[tokio::test]
    async fn lookup_matches_path_and_captures_params() {
        let router = Router::new().on("/users/{id}", |req: Request| async move {
            Response::text(req.param("id").unwrap_or("?").to_owned())
        });

        let (handler, params) = router.lookup("/users/42").expect("route should match");
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let res = handler
            .call(request(Method::GET, "/users/42", params))
            .await;
        assert_eq!(&res.body[..], b"42");
    }

    #[tokio::test]
    async fn lookup_ignores_the_method() {
        let router = Router::new().on("/echo", |_req: Request| async { Response::text("hit") });

        for method in [Method::GET, Method::POST, Method::DELETE] {
            let (handler, params) = router.lookup("/echo").expect("route should match");
            let res = handler.call(request(method, "/echo", params)).await;
            assert_eq!(&res.body[..], b"hit");
        }
    }

    #[test]
    fn lookup_misses_unregistered_paths() {
        let router = Router::new().on("/known", |_req: Request| async { Response::text("") });
        assert!(router.lookup("/unknown").is_none());
    }
}
