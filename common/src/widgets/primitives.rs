//! Procedural shape primitives used by the animation phases.

use embedded_graphics::pixelcolor::Rgb888;

use crate::canvas::Canvas;

/// Draw the 1-pixel outline of a circle with the midpoint algorithm.
///
/// Each step of the first octant is mirrored into all eight octants, so the
/// point count grows linearly with `radius`. No anti-aliasing. A zero
/// radius plots only the centre. Off-canvas points are clipped.
pub fn draw_circle(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    radius: u32,
    color: Rgb888,
) {
    let mut x = radius as i32;
    let mut y = 0i32;
    let mut decision = 1 - x;

    while x >= y {
        for (dx, dy) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
            canvas.set_pixel(cx + dx, cy + dy, color);
        }

        y += 1;
        if decision < 0 {
            decision += 2 * y + 1;
        } else {
            x -= 1;
            decision += 2 * (y - x) + 1;
        }
    }
}

/// Draw concentric outlines for every radius from 0 to `radius` inclusive.
pub fn draw_rings(
    canvas: &mut Canvas,
    cx: i32,
    cy: i32,
    radius: u32,
    color: Rgb888,
) {
    for r in 0..=radius {
        draw_circle(canvas, cx, cy, r, color);
    }
}
