// src/types/mod.rs
pub mod resume;

pub use resume::*;
