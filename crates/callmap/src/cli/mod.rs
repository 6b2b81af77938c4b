//! CLI command implementations.

mod display;

pub mod index;
pub mod sample;
