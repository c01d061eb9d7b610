//! Icon image processing.
//!
//! # Modules
//!
//! - [`svg`]: SVG documents and the per-icon transformation
//! - [`sprite`]: grid packing of exported icons into one sheet

pub mod sprite;
pub mod svg;
