//! Shared helpers and input limits.

pub mod validation;
