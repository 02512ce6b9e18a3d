//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - The `Usage` model and per-target reports
//! - The project directory layout
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - File reading strategies

pub mod error;
pub mod file_reader;
pub mod layout;
pub mod model;
pub mod paths;
pub mod render;
