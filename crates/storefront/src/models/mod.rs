//! Domain models for storefront.

pub mod session;

pub use session::{ShopSession, keys as session_keys};
