//! Delegated native image protocols: kitty and iTerm2.
//!
//! Both draw a whole image block at the cursor from one escape payload, so
//! they share the Sixel adapter's canvas shape: blob on the first requested
//! row between cursor save/restore, padding everywhere else. Payloads are
//! base64; kitty takes raw RGBA in 4096-byte chunks, iTerm2 takes a whole
//! PNG file.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;

use crate::canvas::{Canvas, Run};

/// kitty control chunks are capped at this many payload bytes.
const KITTY_CHUNK: usize = 4096;

/// Render the image for the kitty graphics protocol.
#[must_use]
pub fn kitty_canvas(image: &DynamicImage, cols: usize, rows: usize) -> Canvas {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let payload = BASE64.encode(rgba.as_raw());

    let mut blob = String::new();
    let chunks: Vec<&[u8]> = payload.as_bytes().chunks(KITTY_CHUNK).collect();
    let total = chunks.len();
    for (i, chunk) in chunks.into_iter().enumerate() {
        let more = usize::from(i + 1 < total);
        if i == 0 {
            blob.push_str(&format!(
                "\x1b_Gf=32,s={w},v={h},a=T,c={cols},r={rows},m={more};"
            ));
        } else {
            blob.push_str(&format!("\x1b_Gm={more};"));
        }
        // Chunks split a base64 string, always valid UTF-8.
        blob.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        blob.push_str("\x1b\\");
    }

    blob_canvas(blob, cols, rows)
}

/// Render the image for the iTerm2 inline-images protocol.
///
/// A PNG encode failure falls back to the blank placeholder; a broken image
/// must not abort rendering of the surrounding text.
#[must_use]
pub fn iterm_canvas(image: &DynamicImage, cols: usize, rows: usize) -> Canvas {
    let mut png = Vec::new();
    if let Err(error) = image.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
    {
        tracing::warn!("PNG encode failed, rendering blank image box: {error}");
        return super::placeholder_canvas(cols, rows);
    }

    let blob = format!(
        "\x1b]1337;File=inline=1;size={};width={cols};height={rows};preserveAspectRatio=1:{}\x07",
        png.len(),
        BASE64.encode(&png)
    );
    blob_canvas(blob, cols, rows)
}

/// First row carries the blob between cursor save/restore; the rest pad.
fn blob_canvas(blob: String, cols: usize, rows: usize) -> Canvas {
    let mut canvas = Canvas::new(cols);
    for row in 0..rows {
        if row == 0 {
            canvas.push_row(vec![
                Run::raw(format!("\x1b7{blob}\x1b8")),
                Run::blank(cols),
            ]);
        } else {
            canvas.push_row(vec![Run::blank(cols)]);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RunKind;

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            w,
            h,
            image::Rgba([1, 2, 3, 255]),
        ))
    }

    #[test]
    fn test_kitty_blob_shape() {
        let canvas = kitty_canvas(&solid(8, 8), 4, 2);
        let first = canvas.row(0);
        assert_eq!(first[0].kind, RunKind::Raw);
        assert!(first[0].text.contains("\x1b_Gf=32,s=8,v=8,a=T"));
        assert!(canvas.row(1).iter().all(|r| r.kind == RunKind::Text));
    }

    #[test]
    fn test_kitty_chunking_marks_continuations() {
        // 64x64 RGBA ≈ 16 KiB raw, > one 4096-byte base64 chunk.
        let canvas = kitty_canvas(&solid(64, 64), 4, 2);
        let blob = &canvas.row(0)[0].text;
        assert!(blob.contains("m=1;"));
        assert!(blob.contains("\x1b_Gm=0;") || blob.contains(",m=0;"));
    }

    #[test]
    fn test_iterm_blob_shape() {
        let canvas = iterm_canvas(&solid(8, 8), 4, 2);
        let first = canvas.row(0);
        assert_eq!(first[0].kind, RunKind::Raw);
        assert!(first[0].text.starts_with("\x1b7\x1b]1337;File=inline=1;"));
        assert!(first[0].text.contains("width=4;height=2"));
        assert_eq!(canvas.row_string(1), "    ");
    }
}
