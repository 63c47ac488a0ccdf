//! NFXSELLERAASHU Core - storefront domain logic.
//!
//! This crate holds everything the storefront needs to know about products,
//! carts and checkout, independent of any HTTP or rendering layer. The
//! `storefront` crate renders it with axum and askama.
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! sessions, no HTTP. Every operation can be unit-tested without a UI harness.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices with `en-IN` formatting, product offers
//! - [`catalog`] - The embedded, validated product list
//! - [`cart`] - Cart store keyed by (product, validity)
//! - [`navigation`] - View state machine
//! - [`checkout`] - Order IDs and the WhatsApp hand-off message
//! - [`ticker`] - Tick-driven models for the cosmetic timers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod navigation;
pub mod ticker;
pub mod types;

pub use cart::{Cart, CartError, CartKey, CartSnapshot, LineItem, SnapshotLine};
pub use catalog::{Catalog, CatalogError, Quote};
pub use checkout::{CheckoutError, CheckoutHandoff, CheckoutInitiator};
pub use navigation::{NavIntent, NavigationError, Navigator, View};
pub use types::*;
