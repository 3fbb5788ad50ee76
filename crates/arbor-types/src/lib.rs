//! Foundation types for Arbor.
//!
//! This crate provides the key and temporal types shared by every other
//! Arbor crate. A [`Key`] names one record in a hierarchical key-value
//! store: a kind (logical collection name), an identifier, and an optional
//! ancestor chain. Keys are plain values — they carry no connection state
//! and are cheap to clone, compare, and hash.
//!
//! # Key Types
//!
//! - [`Key`] — hierarchical storage key: `(kind, id, parent)`
//! - [`Id`] — record identifier: string, integer, or store-allocated
//! - [`Timestamp`] — wall-clock milliseconds since the UNIX epoch
//! - [`Clock`] — injectable time source ([`SystemClock`], [`FixedClock`])

pub mod error;
pub mod key;
pub mod temporal;

pub use error::KeyError;
pub use key::{Id, Key};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
