//! Sixel image rendering.
//!
//! A Sixel blob paints a whole multi-row block in one shot at the cursor
//! position, so the canvas shape is asymmetric: the first row of the
//! requested region carries the entire encoded image between a cursor
//! save/restore pair, and every other row is pure horizontal padding. A
//! scrolled view passes a row-trimmed sub-image and gets a fresh blob.
//!
//! Colors are quantized to a fixed 6×6×6 cube (216 registers), within the
//! customary 256-register budget of Sixel terminals.

use image::DynamicImage;

use crate::canvas::{Canvas, Run};

/// Number of pixel rows in one sixel band.
const BAND: u32 = 6;

/// Render the image as a Sixel blob canvas of `cols`×`rows` cells.
#[must_use]
pub fn sixel_canvas(image: &DynamicImage, cols: usize, rows: usize) -> Canvas {
    let blob = encode(image);
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

/// Quantize a pixel to its 6×6×6 cube register.
fn register(px: [u8; 4]) -> usize {
    let level = |c: u8| (usize::from(c) * 5 + 127) / 255;
    level(px[0]) * 36 + level(px[1]) * 6 + level(px[2])
}

/// The cube register's RGB, in the 0–100 percentage scale Sixel expects.
const fn register_rgb(index: usize) -> (usize, usize, usize) {
    ((index / 36) * 20, (index / 6 % 6) * 20, (index % 6) * 20)
}

/// Encode the full image as one Sixel sequence.
fn encode(image: &DynamicImage) -> String {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();

    let mut used = [false; 216];
    for px in rgba.pixels() {
        if px.0[3] >= 128 {
            used[register(px.0)] = true;
        }
    }

    let mut out = String::from("\x1bPq");
    out.push_str(&format!("\"1;1;{w};{h}"));
    for (index, _) in used.iter().enumerate().filter(|(_, u)| **u) {
        let (r, g, b) = register_rgb(index);
        out.push_str(&format!("#{index};2;{r};{g};{b}"));
    }

    let mut band_start = 0;
    while band_start < h {
        let mut first_color = true;
        for (index, _) in used.iter().enumerate().filter(|(_, u)| **u) {
            let mut column_bits = vec![0u8; w as usize];
            let mut any = false;
            for dy in 0..BAND.min(h - band_start) {
                for x in 0..w {
                    let px = rgba.get_pixel(x, band_start + dy).0;
                    if px[3] >= 128 && register(px) == index {
                        column_bits[x as usize] |= 1 << dy;
                        any = true;
                    }
                }
            }
            if !any {
                continue;
            }
            if !first_color {
                // Carriage return: repaint the same band in the next color.
                out.push('$');
            }
            first_color = false;
            out.push_str(&format!("#{index}"));
            emit_run_length(&mut out, &column_bits);
        }
        band_start += BAND;
        if band_start < h {
            out.push('-');
        }
    }

    out.push_str("\x1b\\");
    out
}

/// Append one band's column bytes with run-length compression.
fn emit_run_length(out: &mut String, column_bits: &[u8]) {
    let mut i = 0;
    while i < column_bits.len() {
        let bits = column_bits[i];
        let mut count = 1;
        while i + count < column_bits.len() && column_bits[i + count] == bits {
            count += 1;
        }
        let ch = (63 + bits) as char;
        if count > 3 {
            out.push_str(&format!("!{count}{ch}"));
        } else {
            for _ in 0..count {
                out.push(ch);
            }
        }
        i += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RunKind;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(w, h, image::Rgba(px)))
    }

    #[test]
    fn test_blob_only_on_first_row() {
        let canvas = sixel_canvas(&solid(12, 12, [255, 255, 255, 255]), 6, 3);
        assert_eq!(canvas.rows(), 3);

        let first = canvas.row(0);
        assert_eq!(first[0].kind, RunKind::Raw);
        assert!(first[0].text.starts_with("\x1b7\x1bPq"));
        assert!(first[0].text.ends_with("\x1b\\\x1b8"));

        for r in 1..3 {
            assert!(canvas.row(r).iter().all(|run| run.kind == RunKind::Text));
            assert_eq!(canvas.row_string(r), "      ");
        }
    }

    #[test]
    fn test_rows_keep_full_padding_width() {
        let canvas = sixel_canvas(&solid(4, 4, [0, 0, 0, 255]), 5, 2);
        assert_eq!(canvas.row_string(0), "     ");
        assert_eq!(canvas.cols(), 5);
    }

    #[test]
    fn test_transparent_image_defines_no_registers() {
        let canvas = sixel_canvas(&solid(4, 4, [9, 9, 9, 0]), 2, 1);
        let blob = &canvas.row(0)[0].text;
        assert!(!blob.contains('#'), "unexpected palette entry: {blob}");
    }

    #[test]
    fn test_register_quantization_bounds() {
        assert_eq!(register([0, 0, 0, 255]), 0);
        assert_eq!(register([255, 255, 255, 255]), 215);
        assert_eq!(register_rgb(215), (100, 100, 100));
    }
}
