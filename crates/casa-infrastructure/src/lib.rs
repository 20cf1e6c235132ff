//! CASA infrastructure layer.
//!
//! Concrete collaborator implementations: the Fake Store catalog client,
//! the in-memory cart store, and a logging view sink.

pub mod fake_store;
pub mod logging_view;
pub mod memory_cart;

pub use fake_store::FakeStoreCatalog;
pub use logging_view::LoggingViewSink;
pub use memory_cart::InMemoryCartStore;
