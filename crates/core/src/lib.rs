//! Core business logic for redsocial.
//!
//! Services own every cross-entity rule: uniqueness checks, foreign-key
//! validation, cascade deletion, comment threading, the follow graph,
//! and denormalized counter maintenance. Each mutating sequence runs
//! inside a single store transaction.

pub mod services;

pub use services::*;
