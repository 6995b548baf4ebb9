//! Utility functions shared by the detectors and the exception engine.

pub mod paths;

#[doc(inline)]
pub use paths::{is_strict_ancestor, DEFAULT_SEPARATOR};
