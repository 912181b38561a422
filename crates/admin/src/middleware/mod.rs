//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (no framing, no caching)
//! 4. Route guard (token cookie required outside `/login`, `/logout`, `/health`)
//! 5. Rate limiting on login (governor)

pub mod guard;
pub mod rate_limit;

pub use guard::{AdminToken, require_admin_cookie};
pub use rate_limit::login_rate_limiter;
