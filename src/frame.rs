use crate::error::{GifsciiError, GifsciiResult};

/// Resolved dimensions of the full animation surface. Resolved once per
/// decode and frozen afterwards; later frames are positioned onto it even if
/// they report different sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> GifsciiResult<Self> {
        if width == 0 || height == 0 {
            return Err(GifsciiError::malformed(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// How the canvas is modified after a frame's display interval ends, before
/// the next frame is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Disposal {
    /// Leave the canvas as-is; the next frame draws on top.
    None,
    /// Clear the rectangle this frame occupied back to transparent.
    RestoreToBackground,
    /// Restore the whole canvas to its state before this frame was drawn.
    RestoreToPrevious,
}

/// One raw, possibly sub-canvas frame as yielded by the codec. Straight-alpha
/// RGBA8, positioned at (left, top) on the canvas.
///
/// `delay_cs` and `disposal` are `Option` because a codec may fail to supply
/// them; the compositor rejects such frames rather than guessing defaults,
/// since a wrong disposal corrupts every subsequent frame.
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub rgba8: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
    /// Display delay in hundredths of a second.
    pub delay_cs: Option<u16>,
    pub disposal: Option<Disposal>,
}

impl RawFrame {
    pub(crate) fn expected_byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// One fully-composited, full-canvas output frame. Owns its buffer outright;
/// no instance aliases another's storage.
///
/// `delay_cs` and `disposal` are carried through so callers can filter
/// zero-delay preparation frames without re-decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositedFrame {
    pub rgba8: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub delay_cs: u16,
    pub disposal: Disposal,
}
