//! # Shelf Core
//!
//! Core types for the Shelf file gateway.
//!
//! This crate contains everything the HTTP surface and the upstream adapter
//! share:
//! - Gateway configuration resolved once at startup
//! - The [`ContentsStore`] trait: the seam between request handlers and the
//!   hosted contents API
//! - The listing/content record types and the store error taxonomy
//! - The static extension-to-MIME table
//!
//! **No API concerns**: HTTP routing, status mapping, and CORS belong in
//! `api-rest`; the concrete GitHub client belongs in `shelf-github`.

pub mod config;
pub mod mime;
pub mod store;

pub use config::{ConfigError, GatewayConfig};
pub use store::{ContentsStore, FetchedFile, RemoteFile, StoreError, StoreResult};
