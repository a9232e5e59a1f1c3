//! Utility modules: build info, data-directory helpers.

pub mod build_info;
pub mod persistence;

pub use build_info::*;
