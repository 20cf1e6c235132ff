//! CASA core domain layer.
//!
//! Shared error type, session state, classification payload types, and the
//! collaborator interfaces (classifier, catalog, cart, view sink) the
//! orchestration pipeline is built against.

pub mod cart;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod session;
pub mod view;

// Re-export common error type
pub use error::{CasaError, Result};
