//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, tags Sentry, echoes the header)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. CSP nonce (generate per-request nonce)
//! 6. Security headers (CSP with the nonce, framing and isolation headers)
//!
//! The `Shop` extractor then loads the visitor's state inside handlers.

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod shop;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use shop::Shop;
