//! HTTP handlers

pub mod index;
pub mod predict;
