//! Client for the Phisherman reputation backend.
//!
//! The backend owns every report record. This crate only moves data across
//! the wire: domain lookups, report submission, review transitions and the
//! brand catalogue.

pub mod backend;
pub mod brands;
pub mod client;
pub mod error;

pub use backend::{ReputationBackend, Transition};
pub use brands::BrandCache;
pub use client::PhishermanClient;
pub use error::{ReputationError, Result};
