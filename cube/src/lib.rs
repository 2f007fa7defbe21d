//! Image cube primitives shared by the photometric processing tools.
//!
//! - [`size`]: cube dimensions
//! - [`special`]: reserved special-pixel sentinels
//! - [`label`]: keyword groups attached to a cube
//! - [`image`]: the in-memory cube and its JSON persistence
//! - [`process`]: line-parallel processing over a cube

pub mod image;
pub mod label;
pub mod process;
pub mod size;
pub mod special;

pub use image::{Cube, CubeError};
pub use label::{Label, LabelGroup};
pub use process::{process_by_line, LineIndex};
pub use size::CubeSize;
pub use special::{is_special, is_valid, SpecialPixel, NULL8};
