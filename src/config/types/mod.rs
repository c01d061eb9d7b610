//! Configuration utility types.
//!
//! | Module    | Purpose                                         |
//! |-----------|-------------------------------------------------|
//! | `color`   | Validated hex colors                            |
//! | `error`   | Fatal errors and recoverable diagnostics        |
//! | `field`   | Dotted field paths used in diagnostics          |
//! | `lenient` | Scalars that survive type errors for diagnosis  |

mod color;
mod error;
mod field;
mod lenient;

pub use color::HexColor;
pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use lenient::Lenient;
