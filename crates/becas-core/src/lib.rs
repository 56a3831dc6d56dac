//! Core types and trait definitions for the scholarship registry.
//!
//! This crate is deliberately free of HTTP, spreadsheet and database
//! dependencies. Storage backends implement [`store::RecordStore`]; the
//! ingestion pipeline and the web layer depend on that abstraction only.

// Native `async fn` in traits; the store traits spell out their `Send`
// bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod row;
pub mod store;
pub mod text;

pub use error::{Error, Result};
pub use record::{Recipient, Worker, YearlyRecord};
