//! Configuration section definitions.
//!
//! Each module corresponds to a part of the export config:
//!
//! | Module   | TOML                             | Purpose                          |
//! |----------|----------------------------------|----------------------------------|
//! | `output` | `format`, `rasterizer`           | What to produce and how          |
//! | `style`  | `[global_style]`, `[<icon-id>]`  | Padding, shield, halo, fill      |
//! | `sprite` | `[sprite]`                       | Sprite sheet layout              |
//! | `font`   | `[font]`                         | Icon font compilation            |

mod font;
mod output;
mod sprite;
mod style;

pub use font::{FontConfig, FontSection};
pub use output::{ExportFormat, Rasterizer};
pub use sprite::{SpriteConfig, SpriteSection};
pub use style::{Halo, Shield, Stroke, Style, StyleConfig};
