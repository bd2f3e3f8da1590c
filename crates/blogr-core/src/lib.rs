//! Core types and trait definitions for the Blogr entry catalog.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::EntryStore`] and [`store::UserStore`]; the HTTP layers
//! depend only on those traits.

pub mod entry;
pub mod error;
pub mod humanize;
pub mod memory;
pub mod paginate;
pub mod slug;
pub mod store;
pub mod user;

pub use error::{Error, Result};
