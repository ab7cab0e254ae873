use glam::DVec2;

use crate::map::geometry::draw_line;

/// Drawing surface the map is rasterized onto.
///
/// Coordinates are in canvas pixel space; anything outside the canvas is
/// silently dropped by the implementation.
pub trait PixelCanvas {
    /// Turn on the pixel under `at`.
    fn set_pixel(&mut self, at: DVec2);

    /// Draw a straight line between two pixel positions (endpoints included).
    fn draw_line(&mut self, from: DVec2, to: DVec2);

    /// Place `text` starting at the character cell that contains `at`.
    fn set_text(&mut self, at: DVec2, text: &str);

    /// Render the canvas to a block of text, one line per character row.
    fn render(&self) -> String;
}

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    pixels: Vec<Vec<u8>>, // Bit patterns per char
    text: Vec<Vec<Option<char>>>, // Text overlay, wins over dots
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![vec![0u8; width]; height],
            text: vec![vec![None; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Far corner of the pixel area, `(width*2, height*4)`
    pub fn pixel_extent(&self) -> DVec2 {
        DVec2::new(self.width() as f64 * 2.0, self.height() as f64 * 4.0)
    }

    /// Set a pixel at the given coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_dot(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        self.pixels[cy][cx] |= bit;
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_dot(x as usize, y as usize);
        }
    }

    /// Get a specific row as a string (for line-by-line rendering)
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.pixels[row]
            .iter()
            .zip(&self.text[row])
            .map(|(&b, &text)| {
                text.unwrap_or_else(|| char::from_u32(0x2800 + b as u32).unwrap_or(' '))
            })
            .collect()
    }

    /// Get all rows as an iterator of strings
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|i| self.row_to_string(i))
    }
}

/// Truncate a projected position to the pixel that contains it. NaN and
/// infinite positions have no pixel.
#[inline(always)]
fn to_pixel(at: DVec2) -> Option<(i32, i32)> {
    at.is_finite().then(|| (at.x as i32, at.y as i32))
}

impl PixelCanvas for BrailleCanvas {
    fn set_pixel(&mut self, at: DVec2) {
        if let Some((x, y)) = to_pixel(at) {
            self.set_pixel_signed(x, y);
        }
    }

    fn draw_line(&mut self, from: DVec2, to: DVec2) {
        draw_line(self, from, to);
    }

    fn set_text(&mut self, at: DVec2, text: &str) {
        let Some((x, y)) = to_pixel(at) else {
            return;
        };
        if x < 0 || y < 0 {
            return;
        }
        let cx = x as usize / 2;
        let cy = y as usize / 4;
        if cy >= self.height {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            match self.text[cy].get_mut(cx + i) {
                Some(cell) => *cell = Some(ch),
                None => break,
            }
        }
    }

    fn render(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }
}
