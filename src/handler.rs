//! Handler trait and type erasure.
//!
//! # Why handlers are erased
//!
//! Two places need to treat handlers of *different* concrete types
//! uniformly: the router stores many of them in one table, and a middleware
//! wraps one without knowing what it wraps. Both work against a single
//! erased representation, [`BoxedHandler`] — an `Arc<dyn ErasedHandler>`
//! produced once, at registration time.
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user code
//!        ↓ router.on("/hello", hello)  /  middleware::chain(hello, …)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← stored as BoxedHandler
//!        ↓ at request time
//! handler.call(req)                                ← one vtable dispatch
//!        ↓
//! Box::pin(async { hello(req).await.into_response() })
//! ```
//!
//! Per request each layer costs one `Arc` clone (an atomic increment) and
//! one virtual call — noise next to the network I/O either side of it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place — it must not
/// move in memory after the first poll. `Send + 'static` so tokio may move
/// it across worker threads between polls.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it is the trait
/// object inside the public [`BoxedHandler`] alias. External crates have no
/// reason to name it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
///
/// This is the unit the router stores and the unit middleware wraps:
/// a middleware receives the next `BoxedHandler` in the chain and returns a
/// new one around it.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn name(req: Request) -> impl IntoResponse`, which also covers the
/// closures [`middleware`](crate::middleware) builds when it wraps a handler.
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it, which keeps the erasure machinery an
/// implementation detail.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// The sealing module. `Sealed` is private, so external crates cannot name
/// it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Any `Fn(Request) -> Future<impl IntoResponse>` is a handler: named
/// `async fn` items, closures returning `async move` blocks, and function
/// structs alike.
impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype holding a concrete handler `F`, bridging the typed world to the
/// trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // The concrete future is produced outside the async block so the
        // closure itself never crosses an await point.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
