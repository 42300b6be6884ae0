//! Core types and trait definitions for the OSP survey service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the HTTP API both build on it.

mod de;
pub mod error;
pub mod id;
pub mod response;
pub mod store;
pub mod survey;
pub mod token;
pub mod validate;

pub use error::{Error, Result};
pub use id::ObjectId;
