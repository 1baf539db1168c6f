//! Kitbay Core - domain library for the company hardware storefront.
//!
//! This crate holds everything the storefront and CLI share:
//! - `storefront` - server-rendered store and JSON API
//! - `cli` - command-line access to the same cart, tax and order operations
//!
//! # Architecture
//!
//! The core crate does no network or file I/O. Per-user state goes through
//! the [`storage::LocalStorage`] trait, and orders come from an injected
//! [`orders::OrderSource`], so callers decide where data actually lives.
//!
//! # Modules
//!
//! - [`cart`] - cart rules and the persistent [`cart::CartStore`]
//! - [`pricing`] - currency conversion and order totals
//! - [`tax`] - office tax table and tax calculation
//! - [`orders`] - order records, status assignment and tracking timeline
//! - [`catalog`] - product list, comparison and recommendations
//! - [`checkout`] - cart to checkout handoff
//! - [`preferences`] - display currency preference
//! - [`storage`] - the client-resident key/value abstraction
//! - [`types`] - newtype keys, prices and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
mod de;
pub mod orders;
pub mod preferences;
pub mod pricing;
pub mod storage;
pub mod tax;
pub mod types;

pub use types::*;
