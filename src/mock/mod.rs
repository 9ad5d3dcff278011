//! A lightweight in-process beers service that speaks the same contract as
//! the real one. Used by the integration tests and by `beertap serve` so the
//! suite can be exercised without a deployed instance.

mod server;

pub use server::*;
