//! Named resources a render pass draws on: font files and raster images.

pub mod font;
pub mod store;

pub use font::{FontOrigin, FontResolver, ResolvedFont};
pub use store::{DirResourceStore, MemoryResourceStore, ResourceStore};
