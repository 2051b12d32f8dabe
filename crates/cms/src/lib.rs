//! CMS client adapter for the Puspresma portal backend.
//!
//! The portal owns no storage; every record lives in a Directus-style
//! headless item store reached over REST. This crate provides:
//!
//! - **Client**: one outbound request per call via [`CmsClient`], envelope
//!   parsing, and remapping of the store's known error shapes
//! - **Queries**: [`Filter`] condition trees and [`Query`] parameter
//!   serialization
//! - **Records**: typed rows per collection under [`records`]
//! - **Repositories**: one per collection under [`repositories`], with
//!   soft-delete-aware default filters

pub mod client;
pub mod query;
pub mod records;
pub mod repositories;

pub use client::{AuthTokens, CmsClient, CmsUser, Meta};
pub use query::{Filter, Query};
