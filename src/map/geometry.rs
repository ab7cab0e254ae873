use glam::DVec2;

use crate::braille::BrailleCanvas;

/// Clip the segment `from`-`to` to the rectangle `[0, max.x] x [0, max.y]`
/// (Liang-Barsky). Returns `None` when no part of it is inside or either
/// endpoint is not finite.
pub fn clip_segment(from: DVec2, to: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    if !from.is_finite() || !to.is_finite() {
        return None;
    }

    let delta = to - from;
    let mut enter = 0.0f64;
    let mut leave = 1.0f64;

    // (direction towards the edge, distance to the edge) per boundary
    let edges = [
        (-delta.x, from.x),
        (delta.x, max.x - from.x),
        (-delta.y, from.y),
        (delta.y, max.y - from.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: inside or not at all
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let t = q / p;
        if p < 0.0 {
            if t > leave {
                return None;
            }
            enter = enter.max(t);
        } else {
            if t < enter {
                return None;
            }
            leave = leave.min(t);
        }
    }

    // Rounding can push a far endpoint a hair past the boundary
    let clip = |t: f64| (from + delta * t).clamp(DVec2::ZERO, max);
    Some((clip(enter), clip(leave)))
}

/// Draw a line between two pixel positions, endpoints included.
///
/// The segment is clipped to the canvas before stepping, so the work is
/// bounded by the canvas size however far off the endpoints are.
pub fn draw_line(canvas: &mut BrailleCanvas, from: DVec2, to: DVec2) {
    let Some((from, to)) = clip_segment(from, to, canvas.pixel_extent()) else {
        return;
    };
    step_line(
        (from.x as i32, from.y as i32),
        (to.x as i32, to.y as i32),
        |x, y| canvas.set_pixel_signed(x, y),
    );
}

/// Bresenham stepping from `start` to `end`, visiting every pixel once
fn step_line(start: (i32, i32), end: (i32, i32), mut plot: impl FnMut(i32, i32)) {
    let (x1, y1) = end;
    let dx = (x1 - start.0).abs();
    let dy = -(y1 - start.1).abs();
    let sx = if start.0 < x1 { 1 } else { -1 };
    let sy = if start.1 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = start;

    loop {
        plot(x, y);

        if (x, y) == end {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
