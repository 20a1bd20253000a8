#![forbid(unsafe_code)]

pub mod ascii;
pub mod codec;
pub mod compositor;
pub mod error;
pub mod frame;

pub use ascii::AsciiOptions;
pub use codec::{FrameSource, GifSource};
pub use compositor::{Compositor, composite_all};
pub use error::{GifsciiError, GifsciiResult};
pub use frame::{CanvasSize, CompositedFrame, Disposal, RawFrame};
