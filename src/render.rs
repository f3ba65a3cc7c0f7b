//! CPU rasterization of a resolved design into a panel pixel buffer.

pub mod canvas;
pub mod compositor;
pub mod pipeline;
pub mod text;

pub use canvas::{Canvas, PixelFormat};
pub use pipeline::{RenderContext, render};
