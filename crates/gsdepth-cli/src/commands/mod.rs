//! CLI command implementations.

pub mod bounds;
pub mod common;
pub mod encode;
pub mod synth;
