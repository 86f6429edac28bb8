//! Image-to-canvas adapters for terminal graphics protocols.
//!
//! A decoded raster image plus a declared capability becomes a [`Canvas`]:
//! Unicode half-blocks as the universal fallback, Sixel where supported, and
//! the kitty / iTerm2 native protocols by delegation. Adapters never probe
//! the terminal — capability detection happens once, at startup, in the
//! terminal-driver collaborator, and arrives here as a [`Protocol`] value.

mod cache;
mod halfblock;
mod loader;
mod native;
mod sixel;

pub use cache::ImageCache;
pub use halfblock::halfblock_canvas;
pub use loader::{ImageLoader, LoadResult};
pub use native::{iterm_canvas, kitty_canvas};
pub use sixel::sixel_canvas;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;

/// Terminal graphics capability, as declared by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// No graphics at all; images render as a blank box.
    None,
    /// Unicode half-block cells; works on any color terminal.
    #[default]
    Halfblock,
    /// DEC Sixel graphics.
    Sixel,
    /// kitty graphics protocol.
    Kitty,
    /// iTerm2 inline images.
    Iterm,
}

/// Pixel dimensions of one terminal cell.
///
/// The pixel protocols need a cell-to-pixel ratio to size their output. Font
/// metrics belong to the terminal driver, so this is caller-supplied
/// configuration, never probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBox {
    /// Cell width in pixels.
    pub width_px: u32,
    /// Cell height in pixels.
    pub height_px: u32,
}

impl Default for CellBox {
    fn default() -> Self {
        Self {
            width_px: 10,
            height_px: 20,
        }
    }
}

/// Render a decoded image into a `cols`×`rows` canvas for `protocol`.
///
/// The image is scaled to fit the declared cell box, preserving aspect
/// ratio. This never fails: anything that cannot be rendered (including
/// [`Protocol::None`]) becomes the blank placeholder canvas.
#[must_use]
pub fn image_canvas(
    image: &DynamicImage,
    protocol: Protocol,
    cols: usize,
    rows: usize,
    cell: CellBox,
) -> Canvas {
    if cols == 0 || rows == 0 {
        return Canvas::blank(cols, rows);
    }
    match protocol {
        Protocol::None => placeholder_canvas(cols, rows),
        Protocol::Halfblock => {
            let scaled = image.resize(
                cols as u32,
                (rows * 2) as u32,
                image::imageops::FilterType::Triangle,
            );
            let canvas = halfblock_canvas(&scaled);
            let pad = cols.saturating_sub(canvas.cols());
            canvas
                .pad_trim_left_right(0, pad as isize)
                .pad_trim_rows(rows)
        }
        Protocol::Sixel | Protocol::Kitty | Protocol::Iterm => {
            let scaled = image.resize(
                cols as u32 * cell.width_px,
                rows as u32 * cell.height_px,
                image::imageops::FilterType::Triangle,
            );
            match protocol {
                Protocol::Sixel => sixel_canvas(&scaled, cols, rows),
                Protocol::Kitty => kitty_canvas(&scaled, cols, rows),
                _ => iterm_canvas(&scaled, cols, rows),
            }
        }
    }
}

/// The designated blank canvas substituted for broken or disabled images.
///
/// A failed decode must never abort rendering of the surrounding text.
#[must_use]
pub fn placeholder_canvas(cols: usize, rows: usize) -> Canvas {
    Canvas::blank(cols, rows)
}

/// Round the image's corners by zeroing alpha outside quarter-circles.
///
/// A pre-processing step usable before any adapter; half-block and Sixel
/// output leave the masked corners untouched.
#[must_use]
pub fn rounded(image: &DynamicImage, radius: u32) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let radius = radius.min(w / 2).min(h / 2);
    if radius == 0 {
        return DynamicImage::ImageRgba8(rgba);
    }

    let r = f64::from(radius);
    for (corner_x, corner_y, center_x, center_y) in [
        (0, 0, r - 1.0, r - 1.0),
        (w - radius, 0, f64::from(w - radius), r - 1.0),
        (0, h - radius, r - 1.0, f64::from(h - radius)),
        (
            w - radius,
            h - radius,
            f64::from(w - radius),
            f64::from(h - radius),
        ),
    ] {
        for dy in 0..radius {
            for dx in 0..radius {
                let x = corner_x + dx;
                let y = corner_y + dy;
                let dist_x = f64::from(x) - center_x;
                let dist_y = f64::from(y) - center_y;
                if dist_x.hypot(dist_y) > r {
                    rgba.get_pixel_mut(x, y).0[3] = 0;
                }
            }
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> DynamicImage {
        let img = image::RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_none_protocol_is_blank() {
        let canvas = image_canvas(&checker(8, 8), Protocol::None, 4, 2, CellBox::default());
        assert_eq!(canvas.cols(), 4);
        assert_eq!(canvas.rows(), 2);
        assert_eq!(canvas.row_string(0), "    ");
    }

    #[test]
    fn test_every_protocol_fills_the_box() {
        for protocol in [
            Protocol::Halfblock,
            Protocol::Sixel,
            Protocol::Kitty,
            Protocol::Iterm,
        ] {
            let canvas = image_canvas(&checker(20, 20), protocol, 6, 3, CellBox::default());
            assert_eq!(canvas.cols(), 6, "{protocol:?}");
            assert_eq!(canvas.rows(), 3, "{protocol:?}");
        }
    }

    #[test]
    fn test_rounded_clears_corner_alpha() {
        let img = rounded(&checker(16, 16), 4);
        let rgba = img.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0[3], 0);
        assert_eq!(rgba.get_pixel(15, 0).0[3], 0);
        assert_eq!(rgba.get_pixel(0, 15).0[3], 0);
        assert_eq!(rgba.get_pixel(15, 15).0[3], 0);
        // The center is untouched.
        assert_eq!(rgba.get_pixel(8, 8).0[3], 255);
    }
}
