//! Value types shared by the layout engine.

mod color;
mod geometry;
mod location;
mod span;
mod style;

pub use color::*;
pub use geometry::*;
pub use location::*;
pub use span::*;
pub use style::*;
