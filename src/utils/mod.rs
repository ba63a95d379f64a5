//! Shared utilities.

pub mod duration;

pub use duration::{format_mm_ss, parse_mm_ss};
