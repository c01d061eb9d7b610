//! SVG icon documents.
//!
//! # Modules
//!
//! - [`doc`]: owned element tree over quick-xml (parse, edit, serialize)
//! - [`style`]: inline `style` attribute editing
//! - [`transform`]: padding, shield, halo and fill applied to one icon
//!
//! # Architecture
//!
//! ```text
//! <id>-<size>.svg
//!         │
//!         ▼
//!    ┌──────────┐
//!    │   doc    │ ──► Document (quick-xml events → element tree)
//!    └────┬─────┘
//!         │
//!         ▼
//!    ┌───────────┐
//!    │ transform │ ──► shield / halo / fill, resized viewBox, centered path
//!    └────┬──────┘
//!         │
//!         ▼
//!    markup + new size
//! ```

mod doc;
mod style;
mod transform;

pub use doc::{Document, Element, Node};
pub use transform::transform_icon;
