//! Data models

pub mod prediction;
pub mod sample;

pub use prediction::*;
pub use sample::*;
