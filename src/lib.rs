//! PNG and APNG writer for in-memory pixel arrays.
//!
//! Grayscale, grayscale+alpha, RGB and RGBA arrays of `bool`, `u8` or
//! `u16` samples are written at bit depths 1 to 16, optionally reduced to
//! a palette, with the common ancillary chunks and APNG animation.

mod apng;
mod chunks;
mod error;
mod filters;
mod image_data;
mod palette;
mod pixel;
mod png;
mod scanlines;
mod utils;

pub use apng::{encode_apng, write_apng, Animation, BlendOp, Delay, DisposeOp, FrameControl};
pub use chunks::{
    phys::{PhysicalDimensions, Unit},
    text::TextEntry,
    time::Timestamp,
    ChunkWriter, MAX_CHUNK_LEN,
};
pub use error::{Error, Origin, Result};
pub use filters::FilterStrategy;
pub use image_data::{Compressor, ZlibCompressor};
pub use pixel::{Color, ColorType, ImageView, PixelDescriptor, PixelSource, Sample, Shape};
pub use png::{encode_png, write_png, Encoder, PngOptions};
