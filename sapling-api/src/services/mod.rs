//! Service Layer
//!
//! Business logic for the multi-step fulfillment workflow, kept out of
//! the route handlers so it can run against the in-memory store in
//! tests.

mod fulfillment;

pub use fulfillment::*;
