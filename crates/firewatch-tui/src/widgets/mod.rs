//! Reusable widget helpers.

pub mod format;
