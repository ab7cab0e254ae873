use std::sync::Arc;

use serde::Deserialize;

use crate::braille::{BrailleCanvas, PixelCanvas};
use crate::map::projection::CanvasSpace;

/// A geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A closed ring of points (coastline or border). The last point connects
/// back to the first.
pub type Shape = Vec<Point>;

/// Stroke every shape onto the canvas.
///
/// Each vertex gets a pixel, then a line back to its predecessor. Vertex 0
/// has no predecessor, so it connects to the last vertex instead, which is
/// what closes the ring. A one-point shape yields a pixel and a zero-length
/// line.
pub fn rasterize_shapes<C>(canvas: &mut C, space: &CanvasSpace, shapes: &[Shape])
where
    C: PixelCanvas + ?Sized,
{
    for shape in shapes {
        for (i, point) in shape.iter().enumerate() {
            let partner = if i == 0 {
                &shape[shape.len() - 1]
            } else {
                &shape[i - 1]
            };

            let from = space.project(point.lon, point.lat);
            let to = space.project(partner.lon, partner.lat);

            canvas.set_pixel(from);
            canvas.draw_line(from, to);
        }
    }
}

/// Place a text label at a geographic position
pub fn plot_label<C>(canvas: &mut C, space: &CanvasSpace, lon: f64, lat: f64, text: &str)
where
    C: PixelCanvas + ?Sized,
{
    canvas.set_text(space.project(lon, lat), text);
}

/// Map renderer over a fixed shape catalog
#[derive(Clone)]
pub struct MapRenderer {
    shapes: Arc<[Shape]>,
}

impl MapRenderer {
    pub fn new(shapes: Arc<[Shape]>) -> Self {
        Self { shapes }
    }

    /// Check if any data is loaded
    pub fn has_data(&self) -> bool {
        self.shapes.iter().any(|shape| !shape.is_empty())
    }

    /// Render the catalog into a fresh `cols` x `rows` Braille canvas,
    /// optionally marking a position with a label.
    pub fn render(&self, cols: usize, rows: usize, marker: Option<(f64, f64, &str)>) -> BrailleCanvas {
        let space = CanvasSpace::from_cells(cols, rows);
        let mut canvas = BrailleCanvas::new(cols, rows);

        rasterize_shapes(&mut canvas, &space, &self.shapes);

        if let Some((lon, lat, text)) = marker {
            plot_label(&mut canvas, &space, lon, lat, text);
        }

        canvas
    }
}
