//! Half-block image rendering: two pixels per cell, everywhere.
//!
//! Each output cell shows `▀` with the foreground colored from the upper
//! pixel and the background from the lower one, giving vertical
//! double-resolution on any color terminal. The whole image converts once;
//! callers slice the resulting canvas (via [`crate::widget::CanvasWidget`] or
//! `Canvas::content`) for scrolling without recomputation.

use image::DynamicImage;
use ratatui::style::Color;

use crate::canvas::{Canvas, Run};
use crate::style::Attr;

/// Alpha below this renders as transparent (the terminal's own background).
const ALPHA_CUTOFF: u8 = 128;

/// Convert a decoded image into half-block cells, one row per two pixel
/// rows.
#[must_use]
pub fn halfblock_canvas(image: &DynamicImage) -> Canvas {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let cols = w as usize;

    let mut canvas = Canvas::new(cols);
    let mut y = 0;
    while y < h {
        let mut runs: Vec<Run> = Vec::new();
        for x in 0..w {
            let top = rgba.get_pixel(x, y).0;
            let bottom = if y + 1 < h {
                rgba.get_pixel(x, y + 1).0
            } else {
                [0, 0, 0, 0]
            };
            let (glyph, attr) = cell_for(top, bottom);
            push_cell(&mut runs, glyph, attr);
        }
        canvas.push_row(runs);
        y += 2;
    }
    canvas
}

/// Pick the glyph and colors for one pixel pair, honoring transparency.
fn cell_for(top: [u8; 4], bottom: [u8; 4]) -> (char, Option<Attr>) {
    let top_visible = top[3] >= ALPHA_CUTOFF;
    let bottom_visible = bottom[3] >= ALPHA_CUTOFF;
    match (top_visible, bottom_visible) {
        (true, true) => (
            '▀',
            Some(Attr::Cell {
                fg: Color::Rgb(top[0], top[1], top[2]),
                bg: Color::Rgb(bottom[0], bottom[1], bottom[2]),
            }),
        ),
        (true, false) => (
            '▀',
            Some(Attr::Cell {
                fg: Color::Rgb(top[0], top[1], top[2]),
                bg: Color::Reset,
            }),
        ),
        (false, true) => (
            '▄',
            Some(Attr::Cell {
                fg: Color::Rgb(bottom[0], bottom[1], bottom[2]),
                bg: Color::Reset,
            }),
        ),
        (false, false) => (' ', None),
    }
}

/// Append one cell, merging with the previous run when the attribute
/// repeats.
fn push_cell(runs: &mut Vec<Run>, glyph: char, attr: Option<Attr>) {
    match runs.last_mut() {
        Some(last) if last.attr == attr => {
            last.text.push(glyph);
            last.width += 1;
        }
        _ => runs.push(Run::text(attr, glyph.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(w: u32, h: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(w, h, image::Rgba(px)))
    }

    #[test]
    fn test_one_row_per_two_pixel_rows() {
        let canvas = halfblock_canvas(&flat(4, 6, [10, 20, 30, 255]));
        assert_eq!(canvas.cols(), 4);
        assert_eq!(canvas.rows(), 3);
    }

    #[test]
    fn test_odd_height_rounds_up() {
        let canvas = halfblock_canvas(&flat(2, 5, [10, 20, 30, 255]));
        assert_eq!(canvas.rows(), 3);
    }

    #[test]
    fn test_pixel_pair_colors() {
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let canvas = halfblock_canvas(&DynamicImage::ImageRgba8(img));

        let run = &canvas.row(0)[0];
        assert_eq!(run.text, "▀");
        assert_eq!(
            run.attr,
            Some(Attr::Cell {
                fg: Color::Rgb(255, 0, 0),
                bg: Color::Rgb(0, 0, 255),
            })
        );
    }

    #[test]
    fn test_transparent_pixels_leave_the_background() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([9, 9, 9, 0]));
        img.put_pixel(0, 1, image::Rgba([9, 9, 9, 0]));
        img.put_pixel(1, 0, image::Rgba([9, 9, 9, 0]));
        img.put_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
        let canvas = halfblock_canvas(&DynamicImage::ImageRgba8(img));

        assert_eq!(canvas.row_string(0), " ▄");
        assert_eq!(canvas.row(0)[0].attr, None);
    }

    #[test]
    fn test_uniform_rows_merge_into_one_run() {
        let canvas = halfblock_canvas(&flat(8, 2, [5, 6, 7, 255]));
        assert_eq!(canvas.row(0).len(), 1);
        assert_eq!(canvas.row(0)[0].width, 8);
    }
}
