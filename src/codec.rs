use std::io::Read;

use crate::{
    error::{GifsciiError, GifsciiResult},
    frame::{CanvasSize, Disposal, RawFrame},
};

/// A codec-provided stream of raw animation frames in temporal order.
///
/// `next_frame` returning `Ok(None)` is normal exhaustion, never an error.
pub trait FrameSource {
    /// Full-animation canvas size, if the container declares one up front.
    /// Callable before iteration begins.
    fn canvas_size(&self) -> Option<CanvasSize>;

    fn next_frame(&mut self) -> GifsciiResult<Option<RawFrame>>;
}

/// Adapter over the `gif` crate's decoder. Frames come out as straight-alpha
/// RGBA8 sub-images with their offsets and control metadata; palette and LZW
/// handling stay inside the codec.
pub struct GifSource<R: Read> {
    decoder: gif::Decoder<R>,
}

impl<R: Read> GifSource<R> {
    pub fn new(reader: R) -> GifsciiResult<Self> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let decoder = options
            .read_info(reader)
            .map_err(|e| GifsciiError::unsupported(format!("not a readable gif stream: {e}")))?;
        Ok(Self { decoder })
    }
}

impl<R: Read> FrameSource for GifSource<R> {
    fn canvas_size(&self) -> Option<CanvasSize> {
        // A zero-sized logical screen descriptor is treated as absent; the
        // compositor then falls back to the first frame's dimensions.
        CanvasSize::new(
            u32::from(self.decoder.width()),
            u32::from(self.decoder.height()),
        )
        .ok()
    }

    fn next_frame(&mut self) -> GifsciiResult<Option<RawFrame>> {
        let frame = match self.decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => {
                return Err(GifsciiError::malformed(format!(
                    "gif frame decode failed: {e}"
                )));
            }
        };

        let disposal = match frame.dispose {
            gif::DisposalMethod::Any | gif::DisposalMethod::Keep => Disposal::None,
            gif::DisposalMethod::Background => Disposal::RestoreToBackground,
            gif::DisposalMethod::Previous => Disposal::RestoreToPrevious,
        };

        Ok(Some(RawFrame {
            rgba8: frame.buffer.to_vec(),
            width: u32::from(frame.width),
            height: u32::from(frame.height),
            left: u32::from(frame.left),
            top: u32::from(frame.top),
            delay_cs: Some(frame.delay),
            disposal: Some(disposal),
        }))
    }
}
