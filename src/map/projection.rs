use glam::DVec2;

/// Pixel extent of a canvas the world is projected onto.
///
/// Plain equirectangular mapping: longitude spreads linearly over the width
/// and latitude over the height, with north at the top (y = 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSpace {
    /// Canvas pixel width
    pub width: f64,
    /// Canvas pixel height
    pub height: f64,
}

impl CanvasSpace {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Canvas space for a pane of `cols` x `rows` Braille character cells.
    ///
    /// Braille gives 2x4 pixels per character; the extent is trimmed so the
    /// right and bottom edges always land on the canvas.
    pub fn from_cells(cols: usize, rows: usize) -> Self {
        Self::new(cols as f64 * 2.0 - 1.0, rows as f64 * 4.0 - 5.0)
    }

    /// Horizontal pixel position of a longitude.
    pub fn x(&self, longitude: f64) -> f64 {
        let shifted = longitude + 180.0;

        if shifted == 0.0 {
            0.0
        } else if shifted > 360.0 {
            self.width
        } else {
            shifted * self.width / 360.0
        }
    }

    /// Vertical pixel position of a latitude. The y axis grows southwards.
    pub fn y(&self, latitude: f64) -> f64 {
        let shifted = latitude + 90.0;

        if shifted == 0.0 {
            self.height
        } else if shifted > 180.0 {
            0.0
        } else {
            self.height - shifted * self.height / 180.0
        }
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    #[inline]
    pub fn project(&self, longitude: f64, latitude: f64) -> DVec2 {
        DVec2::new(self.x(longitude), self.y(latitude))
    }
}
