use tracing::debug;

use crate::{
    codec::FrameSource,
    error::{GifsciiError, GifsciiResult},
    frame::{CanvasSize, CompositedFrame, Disposal, RawFrame},
};

/// The single mutable surface of one decode. Never escapes the compositor;
/// callers only ever see snapshot copies.
struct Canvas {
    size: CanvasSize,
    rgba8: Vec<u8>,
}

impl Canvas {
    fn transparent(size: CanvasSize) -> Self {
        Self {
            size,
            rgba8: vec![0; size.byte_len()],
        }
    }

    /// Source-over blit of `frame` at its offset, clipped to the canvas.
    /// Transparent source pixels leave existing content alone.
    fn draw(&mut self, frame: &RawFrame) {
        let cw = self.size.width;
        let ch = self.size.height;
        if frame.left >= cw || frame.top >= ch {
            return;
        }
        let cols = frame.width.min(cw - frame.left) as usize;
        let rows = frame.height.min(ch - frame.top) as usize;

        let cw = cw as usize;
        let fw = frame.width as usize;
        let left = frame.left as usize;
        let top = frame.top as usize;

        for row in 0..rows {
            let src_base = row * fw * 4;
            let dst_base = ((top + row) * cw + left) * 4;
            for col in 0..cols {
                let src = &frame.rgba8[src_base + col * 4..src_base + col * 4 + 4];
                let dst = &mut self.rgba8[dst_base + col * 4..dst_base + col * 4 + 4];
                match src[3] {
                    0 => {}
                    255 => dst.copy_from_slice(src),
                    _ => {
                        let out = over(
                            [dst[0], dst[1], dst[2], dst[3]],
                            [src[0], src[1], src[2], src[3]],
                        );
                        dst.copy_from_slice(&out);
                    }
                }
            }
        }
    }

    /// Clear a rectangle back to fully transparent, clipped to the canvas.
    fn clear_rect(&mut self, left: u32, top: u32, width: u32, height: u32) {
        let cw = self.size.width;
        let ch = self.size.height;
        if left >= cw || top >= ch {
            return;
        }
        let cols = width.min(cw - left) as usize;
        let rows = height.min(ch - top) as usize;

        let cw = cw as usize;
        let left = left as usize;
        let top = top as usize;

        for row in 0..rows {
            let base = ((top + row) * cw + left) * 4;
            self.rgba8[base..base + cols * 4].fill(0);
        }
    }

    fn snapshot(&self) -> Vec<u8> {
        self.rgba8.clone()
    }

    fn restore(&mut self, rgba8: &[u8]) {
        self.rgba8.copy_from_slice(rgba8);
    }
}

/// Source-over for straight-alpha rgba8. Callers fast-path a=0 and a=255.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    let w_src = sa * 255;
    let w_dst = da * (255 - sa);
    let denom = w_src + w_dst;
    if denom == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = ((denom + 127) / 255) as u8;
    for i in 0..3 {
        let c = u32::from(src[i]) * w_src + u32::from(dst[i]) * w_dst;
        out[i] = ((c + denom / 2) / denom) as u8;
    }
    out
}

/// Stateful frame compositor for one animation.
///
/// Each [`push`](Self::push) consumes one raw frame and produces one
/// full-canvas [`CompositedFrame`]; [`finish`](Self::finish) yields the
/// ordered sequence. After a failed `push`, `finish` returns the valid
/// prefix produced so far.
pub struct Compositor {
    global_size: Option<CanvasSize>,
    canvas: Option<Canvas>,
    frames: Vec<CompositedFrame>,
}

impl Compositor {
    pub fn new(global_size: Option<CanvasSize>) -> Self {
        Self {
            global_size,
            canvas: None,
            frames: Vec::new(),
        }
    }

    /// Composite one raw frame onto the canvas, snapshot the result, and
    /// apply the frame's disposal in preparation for the next one.
    pub fn push(&mut self, raw: RawFrame) -> GifsciiResult<&CompositedFrame> {
        let delay_cs = raw
            .delay_cs
            .ok_or_else(|| GifsciiError::malformed("frame control metadata is missing a delay"))?;
        let disposal = raw.disposal.ok_or_else(|| {
            GifsciiError::malformed("frame control metadata is missing a disposal method")
        })?;
        if raw.rgba8.len() != raw.expected_byte_len() {
            return Err(GifsciiError::malformed(format!(
                "frame buffer is {} bytes, expected {} for {}x{} rgba8",
                raw.rgba8.len(),
                raw.expected_byte_len(),
                raw.width,
                raw.height,
            )));
        }

        // Canvas size is resolved exactly once: the container's logical
        // screen size wins, the first frame's own size is the fallback.
        let size = match (&self.canvas, self.global_size) {
            (Some(canvas), _) => canvas.size,
            (None, Some(global)) => global,
            (None, None) => CanvasSize::new(raw.width, raw.height)?,
        };
        if self.canvas.is_none() {
            debug!(width = size.width, height = size.height, "resolved canvas size");
        }
        let canvas = self.canvas.get_or_insert_with(|| Canvas::transparent(size));

        canvas.draw(&raw);

        self.frames.push(CompositedFrame {
            rgba8: canvas.snapshot(),
            width: size.width,
            height: size.height,
            delay_cs,
            disposal,
        });

        match disposal {
            Disposal::None => {}
            Disposal::RestoreToBackground => {
                canvas.clear_rect(raw.left, raw.top, raw.width, raw.height);
            }
            Disposal::RestoreToPrevious => {
                // Undoing a chain of restores reaches back past all of them
                // to the last frame that actually left something behind. No
                // such frame (e.g. the very first one) leaves the canvas as
                // it stands.
                let prior = self.frames[..self.frames.len() - 1]
                    .iter()
                    .rev()
                    .find(|f| f.disposal != Disposal::RestoreToPrevious);
                if let Some(prior) = prior {
                    canvas.restore(&prior.rgba8);
                }
            }
        }

        Ok(&self.frames[self.frames.len() - 1])
    }

    /// Frames produced so far, in order.
    pub fn frames(&self) -> &[CompositedFrame] {
        &self.frames
    }

    pub fn finish(self) -> Vec<CompositedFrame> {
        self.frames
    }
}

/// Drain `source` through a fresh [`Compositor`], returning every composited
/// frame in order. Zero-delay preparation frames are returned too; filtering
/// them is the caller's call.
///
/// On a mid-stream error the already-produced frames are dropped with the
/// compositor; callers that need the valid prefix should drive
/// [`Compositor::push`] themselves and collect it via
/// [`Compositor::finish`].
#[tracing::instrument(skip(source))]
pub fn composite_all<S: FrameSource>(source: &mut S) -> GifsciiResult<Vec<CompositedFrame>> {
    let mut compositor = Compositor::new(source.canvas_size());
    while let Some(raw) = source.next_frame()? {
        compositor.push(raw)?;
    }
    Ok(compositor.finish())
}
