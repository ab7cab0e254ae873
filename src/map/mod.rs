pub mod geometry;
mod projection;
mod renderer;

pub use projection::CanvasSpace;
pub use renderer::{plot_label, rasterize_shapes, MapRenderer, Point, Shape};
