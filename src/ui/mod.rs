//! UI rendering module for cielterm
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod dashboard;
pub mod widgets;

pub use dashboard::render;
