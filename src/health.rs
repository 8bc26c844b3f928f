//! Built-in health-check handlers.
//!
//! Two probes, two questions: [`liveness`] — is the process alive at all —
//! and [`readiness`] — can it take traffic. They register like any other
//! handler:
//!
//! ```rust,no_run
//! use weft::{health, Router};
//!
//! let app = Router::new()
//!     .on("/healthz", health::liveness)
//!     .on("/readyz", health::readiness);
//! ```

use crate::{Request, Response};

/// Liveness probe. Always `200 OK` with body `"ok"` — if the process can
/// answer HTTP at all, it is alive, so this handler has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Default readiness probe: `200 OK` with body `"ready"`. Swap in your own
/// handler to gate readiness on dependency health or a warm-up period.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
