use crate::error::{GifsciiError, GifsciiResult};

/// Glyph ramp indexed by brightness. Zero brightness maps to the final
/// (space) glyph so transparent and pure-black background renders empty.
const GLYPHS: [char; 12] = ['#', 'A', '@', '%', '$', '+', '=', '*', ':', ',', '.', ' '];

const SPAN_LEN: usize = "<span style=\"color:#112233;\">X</span>".len();
const BR_LEN: usize = "<br>".len();

#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiOptions {
    /// Emit HTML color spans (and `<br>` row terminators) instead of plain
    /// characters and newlines.
    pub color: bool,
}

/// Render a straight-alpha rgba8 buffer as glyph text, row by row.
pub fn render(rgba8: &[u8], width: u32, height: u32, opts: &AsciiOptions) -> GifsciiResult<String> {
    let w = width as usize;
    let h = height as usize;
    if rgba8.len() != w * h * 4 {
        return Err(GifsciiError::malformed(format!(
            "ascii render expects a full {width}x{height} rgba8 buffer, got {} bytes",
            rgba8.len()
        )));
    }

    let capacity = if opts.color {
        w * h * SPAN_LEN + h * BR_LEN
    } else {
        w * h + h
    };
    let mut out = String::with_capacity(capacity);

    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) * 4;
            let (r, g, b) = (rgba8[i], rgba8[i + 1], rgba8[i + 2]);
            let glyph = glyph_for(r, g, b);
            if opts.color {
                out.push_str("<span style=\"color:#");
                push_hex(&mut out, r);
                push_hex(&mut out, g);
                push_hex(&mut out, b);
                out.push_str(";\">");
                out.push(glyph);
                out.push_str("</span>");
            } else {
                out.push(glyph);
            }
        }
        out.push_str(if opts.color { "<br>" } else { "\n" });
    }

    Ok(out)
}

/// Weighted Euclidean brightness, 0.0..=255.0. The weights approximate
/// perceptual luminance rather than a straight channel average.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    let r = f32::from(r);
    let g = f32::from(g);
    let b = f32::from(b);
    (r * r * 0.241 + g * g * 0.691 + b * b * 0.068).sqrt()
}

fn glyph_for(r: u8, g: u8, b: u8) -> char {
    let last = GLYPHS.len() - 1;
    let value = brightness(r, g, b);
    let index = if value == 0.0 {
        last
    } else {
        ((value / 255.0) * last as f32) as usize
    };
    GLYPHS[index.min(last)]
}

fn push_hex(out: &mut String, byte: u8) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push(HEX[(byte >> 4) as usize] as char);
    out.push(HEX[(byte & 0x0f) as usize] as char);
}
